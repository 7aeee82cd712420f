//! TCX track documents: XML tree, loading, and serialization.

pub mod loader;
pub mod types;
pub mod writer;
pub mod xml;

pub use loader::{load_track, parse_timestamp};
pub use types::{ExtensionBlock, TrackDocument, NS_TPX};
pub use writer::{render_track, write_track_to_file};
pub use xml::{Element, Node, XmlDocument};
