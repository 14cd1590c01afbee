pub mod instruction;
pub mod list;
pub mod pool;
pub mod verify;

pub use instruction::{Instruction, StackEffect};
pub use list::InstructionList;
pub use pool::{ConstantPool, MethodRefInfo, PoolEntry, PoolIndex};
pub use verify::{VerifySummary, verify};
