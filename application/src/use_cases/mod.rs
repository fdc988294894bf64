//! Use cases - the concurrent core of the client

pub mod dispatch;
pub mod query_session;
