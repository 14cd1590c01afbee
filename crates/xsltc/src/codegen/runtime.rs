//! Descriptors of the runtime operations generated code calls into.

use super::class_gen::ClassGenerator;
use crate::bytecode::{Instruction, PoolIndex};
use crate::config::CompilerConfig;
use crate::error::Error;
use crate::types::Type;

/// Which runtime type declares an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Dom,
    NodeIterator,
    BasisLibrary,
}

impl Owner {
    pub fn class_name(self, cfg: &CompilerConfig) -> &str {
        match self {
            Owner::Dom => &cfg.dom_interface,
            Owner::NodeIterator => &cfg.node_iterator_interface,
            Owner::BasisLibrary => &cfg.basis_library_class,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Called on a receiver of an interface type.
    Interface,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOperation {
    pub owner: Owner,
    pub name: &'static str,
    pub params: &'static [Type],
    pub ret: Type,
    pub dispatch: Dispatch,
}

impl RuntimeOperation {
    pub fn descriptor(&self, cfg: &CompilerConfig) -> String {
        Type::method_descriptor(self.params, self.ret, cfg)
    }

    /// Stack slots an interface invocation of this operation declares: the
    /// receiver plus the declared arguments.
    pub fn interface_count(&self) -> u8 {
        let args: usize = self.params.iter().map(|t| t.slots()).sum();
        (1 + args) as u8
    }

    /// Intern the reference in the class's constant pool.
    pub fn intern(&self, class_gen: &mut ClassGenerator) -> Result<PoolIndex, Error> {
        let owner = self.owner.class_name(class_gen.config()).to_string();
        let descriptor = self.descriptor(class_gen.config());
        let pool = class_gen.constant_pool_mut();
        match self.dispatch {
            Dispatch::Interface => pool.add_interface_methodref(&owner, self.name, &descriptor),
            Dispatch::Static => pool.add_methodref(&owner, self.name, &descriptor),
        }
    }

    /// The call instruction for an already interned reference.
    pub fn invoke(&self, index: PoolIndex) -> Instruction {
        match self.dispatch {
            Dispatch::Interface => Instruction::InvokeInterface {
                index,
                count: self.interface_count(),
            },
            Dispatch::Static => Instruction::InvokeStatic(index),
        }
    }
}

pub const GET_NODE_NAME: RuntimeOperation = RuntimeOperation {
    owner: Owner::Dom,
    name: "getNodeName",
    params: &[Type::Node],
    ret: Type::String,
    dispatch: Dispatch::Interface,
};

pub const GET_NAMESPACE_NAME: RuntimeOperation = RuntimeOperation {
    owner: Owner::Dom,
    name: "getNamespaceName",
    params: &[Type::Node],
    ret: Type::String,
    dispatch: Dispatch::Interface,
};

pub const GET_LOCAL_NAME: RuntimeOperation = RuntimeOperation {
    owner: Owner::BasisLibrary,
    name: "getLocalName",
    params: &[Type::String],
    ret: Type::String,
    dispatch: Dispatch::Static,
};

pub const GET_AXIS_ITERATOR: RuntimeOperation = RuntimeOperation {
    owner: Owner::Dom,
    name: "getAxisIterator",
    params: &[Type::Int],
    ret: Type::NodeSet,
    dispatch: Dispatch::Interface,
};

pub const GET_TYPED_AXIS_ITERATOR: RuntimeOperation = RuntimeOperation {
    owner: Owner::Dom,
    name: "getTypedAxisIterator",
    params: &[Type::Int, Type::Int],
    ret: Type::NodeSet,
    dispatch: Dispatch::Interface,
};

pub const REFERENCE_TO_NODE_SET: RuntimeOperation = RuntimeOperation {
    owner: Owner::BasisLibrary,
    name: "referenceToNodeSet",
    params: &[Type::Reference],
    ret: Type::NodeSet,
    dispatch: Dispatch::Static,
};

pub const NEXT: RuntimeOperation = RuntimeOperation {
    owner: Owner::NodeIterator,
    name: "next",
    params: &[],
    ret: Type::Node,
    dispatch: Dispatch::Interface,
};

pub const SET_START_NODE: RuntimeOperation = RuntimeOperation {
    owner: Owner::NodeIterator,
    name: "setStartNode",
    params: &[Type::Node],
    ret: Type::NodeSet,
    dispatch: Dispatch::Interface,
};

pub const CLONE_ITERATOR: RuntimeOperation = RuntimeOperation {
    owner: Owner::NodeIterator,
    name: "cloneIterator",
    params: &[],
    ret: Type::NodeSet,
    dispatch: Dispatch::Interface,
};
