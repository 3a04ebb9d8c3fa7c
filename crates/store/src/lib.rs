//! `feascheck-store`: persistence for the master and L2 reference datasets.
//!
//! `MasterRepository` hides the dual backing store (cached flat file +
//! SQLite record store) behind `replace`/`resolve`; callers never branch on
//! which backend served the data.

pub mod l2;
pub mod master;

pub use l2::L2Store;
pub use master::MasterRepository;
