mod comment;
pub use comment::Comment;

mod config;
pub use config::ThreadConfig;

mod error;
pub use error::Error;

mod remote;
pub use remote::HttpSync;

mod local;
pub use local::LocalSync;

mod quota;
pub use quota::QuotaTracker;

mod store;
pub use store::ThreadStore;

mod sync;
pub use sync::SyncClient;

mod tree;

pub mod api {
    pub use parley_api::*;
}
