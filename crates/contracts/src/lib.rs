//! Wire-level types shared by the sync engine and its hosts.

pub mod shared;
