//! Handlers: dedicated supervision threads.
//!
//! Two shapes share the same idioms (dedicated thread, bounded wait, single
//! result delivery):
//!
//! - [`single`]: the core three-party protocol loop, one handler owning one
//!   worker for its whole lifetime (crate-internal; driven through
//!   [`ProcessHost`](crate::ProcessHost));
//! - [`pool`]: a one-shot, timeout-bounded worker pool delivering exactly
//!   one aggregate result.

pub(crate) mod single;

mod pool;

pub use pool::{PoolConfig, PoolHandler, PoolResult};
