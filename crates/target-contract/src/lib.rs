//! uipick Target Contract
//!
//! A pickable node ("target root") must satisfy a structural contract
//! before the picker accepts it:
//!
//! - a non-empty id, and a scope of exactly `role` or `instance`
//! - role targets name an allow-listed role group and are namespaced
//!   under it (`homeHub:nav`)
//! - no target nested inside another target, in either direction
//! - exactly one FX surface, either the root itself or one descendant
//! - instance ids unique across the whole tree
//!
//! Every check runs and every failure is reported. Validation is a pure
//! read of the tree and never fails with an error: a broken target is
//! simply `ok == false`.

pub mod audit;
pub mod locator;
pub mod surface;
pub mod validate;
pub mod violation;

pub use audit::*;
pub use locator::*;
pub use surface::*;
pub use validate::*;
pub use violation::*;
