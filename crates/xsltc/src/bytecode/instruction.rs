use super::pool::{ConstantPool, PoolIndex};
use crate::error::{Error, ErrorCode};
use crate::types::MethodSignature;
use core::fmt;

/// The subset of JVM instructions the name-function translators emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    ALoad(u16),
    ILoad(u16),
    DLoad(u16),
    IConst(i8), // -1..=5
    BiPush(i8),
    SiPush(i16),
    // index <= 255
    Ldc(PoolIndex),
    LdcW(PoolIndex),
    InvokeStatic(PoolIndex),
    // count = receiver + argument slots
    InvokeInterface { index: PoolIndex, count: u8 },
}

/// Slots popped and pushed by one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StackEffect {
    pub consumed: usize,
    pub produced: usize,
}

impl StackEffect {
    pub const fn new(consumed: usize, produced: usize) -> Self {
        Self { consumed, produced }
    }

    pub fn delta(self) -> isize {
        self.produced as isize - self.consumed as isize
    }
}

impl Instruction {
    /// Push an integer constant using the shortest encoding; values outside the
    /// `sipush` range go through the pool.
    pub fn push_int(pool: &mut ConstantPool, value: i32) -> Result<Self, Error> {
        Ok(match value {
            -1..=5 => Instruction::IConst(value as i8),
            v if i8::try_from(v).is_ok() => Instruction::BiPush(v as i8),
            v if i16::try_from(v).is_ok() => Instruction::SiPush(v as i16),
            v => Instruction::ldc(pool.add_integer(v)?),
        })
    }

    /// Load a pool constant, widening to `ldc_w` when the index does not fit
    /// in one byte.
    pub fn ldc(index: PoolIndex) -> Self {
        if index.0 <= u16::from(u8::MAX) {
            Instruction::Ldc(index)
        } else {
            Instruction::LdcW(index)
        }
    }

    /// Stack effect of this instruction; invocations are resolved through
    /// the pool to read their descriptor.
    pub fn stack_effect(self, pool: &ConstantPool) -> Result<StackEffect, Error> {
        Ok(match self {
            Instruction::ALoad(_)
            | Instruction::ILoad(_)
            | Instruction::IConst(_)
            | Instruction::BiPush(_)
            | Instruction::SiPush(_)
            | Instruction::Ldc(_)
            | Instruction::LdcW(_) => StackEffect::new(0, 1),
            Instruction::DLoad(_) => StackEffect::new(0, 2),
            Instruction::InvokeStatic(idx) => {
                let sig = signature_of(pool, idx, false)?;
                StackEffect::new(sig.argument_slots(), sig.return_slots())
            }
            Instruction::InvokeInterface { index, count } => {
                let sig = signature_of(pool, index, true)?;
                StackEffect::new(count as usize, sig.return_slots())
            }
        })
    }

    /// Render with pool references resolved to `Owner.name(descriptor)`.
    pub fn display_with<'a>(&'a self, pool: &'a ConstantPool) -> DisplayWith<'a> {
        DisplayWith { instr: self, pool }
    }
}

fn signature_of(pool: &ConstantPool, idx: PoolIndex, interface: bool) -> Result<MethodSignature, Error> {
    let info = pool.expect_method_ref(idx)?;
    if info.interface != interface {
        let expected = if interface { "interface method" } else { "class method" };
        return Err(Error::internal(
            ErrorCode::XSLTC0003,
            format!("{idx} ({info}) is not a {expected} reference"),
        ));
    }
    MethodSignature::parse(info.descriptor)
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::ALoad(n) => write!(f, "aload {n}"),
            Instruction::ILoad(n) => write!(f, "iload {n}"),
            Instruction::DLoad(n) => write!(f, "dload {n}"),
            Instruction::IConst(-1) => write!(f, "iconst_m1"),
            Instruction::IConst(v) => write!(f, "iconst_{v}"),
            Instruction::BiPush(v) => write!(f, "bipush {v}"),
            Instruction::SiPush(v) => write!(f, "sipush {v}"),
            Instruction::Ldc(idx) => write!(f, "ldc {idx}"),
            Instruction::LdcW(idx) => write!(f, "ldc_w {idx}"),
            Instruction::InvokeStatic(idx) => write!(f, "invokestatic {idx}"),
            Instruction::InvokeInterface { index, count } => {
                write!(f, "invokeinterface {index} {count}")
            }
        }
    }
}

pub struct DisplayWith<'a> {
    instr: &'a Instruction,
    pool: &'a ConstantPool,
}

impl fmt::Display for DisplayWith<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.instr {
            Instruction::InvokeStatic(idx) => match self.pool.method_ref(idx) {
                Some(m) => write!(f, "invokestatic {m}"),
                None => write!(f, "{}", self.instr),
            },
            Instruction::InvokeInterface { index, count } => match self.pool.method_ref(index) {
                Some(m) => write!(f, "invokeinterface {m} {count}"),
                None => write!(f, "{}", self.instr),
            },
            Instruction::Ldc(idx) | Instruction::LdcW(idx) => {
                let op = if matches!(self.instr, Instruction::Ldc(_)) { "ldc" } else { "ldc_w" };
                match self.pool.get(idx) {
                    Some(super::pool::PoolEntry::Integer(v)) => write!(f, "{op} {v}"),
                    Some(super::pool::PoolEntry::String { utf8 }) => {
                        write!(f, "{op} {:?}", self.pool.utf8(*utf8).unwrap_or_default())
                    }
                    _ => write!(f, "{}", self.instr),
                }
            }
            _ => write!(f, "{}", self.instr),
        }
    }
}
