mod add;
mod all;
mod delete;
mod entry_input;
mod get;
mod keygen;
mod serve;
mod types;
mod update;
mod version;

pub use add::Add;
pub use all::All;
pub use delete::Delete;
pub use get::Get;
pub use keygen::Keygen;
pub use serve::Serve;
pub use types::Types;
pub use update::Update;
pub use version::Version;
