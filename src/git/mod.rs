// Git module providing the repository reads a release announcement needs

mod commit;
mod repository;
mod tags;

pub use commit::RawCommit;
pub use repository::GitRepo;
pub use tags::TagRef;
