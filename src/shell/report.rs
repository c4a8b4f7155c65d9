use derive_more::Display;

/// Human readable outcome of a successful shell command.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Report {
    #[display("Directory created: {_0}")]
    DirectoryCreated(String),
    #[display("File created: {_0}")]
    FileCreated(String),
    #[display("Copied: {_0}")]
    Copied(String),
    #[display("Cut: {_0}")]
    Cut(String),
    #[display("Pasted: {_0}")]
    Pasted(String),
    #[display("Merged: {from} into {into}")]
    Merged { from: String, into: String },
    #[display("Deleted")]
    Deleted,
    #[display("Found: {_0}")]
    Found(String),
    #[display("File structure exported: {_0} entries")]
    Exported(usize),
    #[display("File structure imported: {_0} entries")]
    Imported(usize),
    #[display("Snapshot saved: {_0}")]
    Saved(String),
    #[display("Snapshot loaded: {_0}")]
    Loaded(String),
    #[display("Directory Name: {name}\nDirectory Path: {path}")]
    Opened { name: String, path: String },
    #[display("{_0}")]
    Listing(String),
    #[display("Goodbye")]
    Exit,
}
