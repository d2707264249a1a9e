//! WebSocket connection management: handles, pool, heartbeat, connect-time auth.

pub mod authenticator;
pub mod handle;
pub mod heartbeat;
pub mod pool;

pub use authenticator::ConnectAuthenticator;
pub use handle::ConnectionHandle;
pub use heartbeat::{HeartbeatConfig, run_heartbeat};
pub use pool::ConnectionPool;
