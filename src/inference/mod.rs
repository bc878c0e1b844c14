//! Backward type inference.
//!
//! Types flow through a template in document order, so every query scans
//! *backward* from the node it was asked about:
//!
//! - [`variable`]: the type of a `$variable` at a given point, taken
//!   from the nearest preceding type-bearing definition of the same name,
//!   then the `{templateType}` class, then host defaults, then `mixed`.
//! - [`chain`]: the type of each link of a member-access chain
//!   (`$a->b()->c`, `Foo::BAR`, `Foo::$baz`), found by walking back past
//!   the access operator to the receiver and looking the member up on the
//!   receiver's classes.
//!
//! Both are `impl Analyzer` blocks; they call into each other
//! recursively (a receiver may be a variable, a variable may be a loop
//! target over a chain).

pub mod chain;
pub mod variable;

pub use variable::PositionedElement;
