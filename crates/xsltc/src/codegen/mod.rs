//! Code generation contexts and the translation seam.

pub mod class_gen;
pub mod expr;
pub mod method_gen;
pub mod runtime;

pub use class_gen::{ClassGenerator, TypeRegistry};
pub use method_gen::{LocalVariable, MethodGenerator};
pub use runtime::{Dispatch, Owner, RuntimeOperation};

use crate::error::Error;

/// A node that appends its instructions to the method being generated.
///
/// Both contexts are borrowed for the duration of one call; nothing is
/// retained between calls.
pub trait Translate {
    fn translate(
        &self,
        class_gen: &mut ClassGenerator,
        method_gen: &mut MethodGenerator,
    ) -> Result<(), Error>;
}
