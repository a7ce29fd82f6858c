//! Host commands reserved by the filesystem layer.
//!
//! Each takes `{ "path": ... }`, plus `"data"` for writes. Replies are
//! objects carrying some of `exists`, `data`, `size`, `error`, `code`.

pub const FILE_EXISTS: &str = "fileExists";
pub const FILE_READ: &str = "fileRead";
pub const FILE_WRITE: &str = "fileWrite";
pub const FILE_DELETE: &str = "fileDelete";
pub const DIRECTORY_REMOVE: &str = "directoryRemove";
