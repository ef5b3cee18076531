bitflags::bitflags! {
    /// JVM `access_flags` as they appear on classes, fields and methods.
    ///
    /// Several bits are shared between element kinds (`SUPER`/`SYNCHRONIZED`,
    /// `VOLATILE`/`BRIDGE`, `TRANSIENT`/`VARARGS`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u16 {
        const PUBLIC       = 0x0001;
        const PRIVATE      = 0x0002;
        const PROTECTED    = 0x0004;
        const STATIC       = 0x0008;
        const FINAL        = 0x0010;
        const SUPER        = 0x0020;
        const SYNCHRONIZED = 0x0020;
        const VOLATILE     = 0x0040;
        const BRIDGE       = 0x0040;
        const TRANSIENT    = 0x0080;
        const VARARGS      = 0x0080;
        const NATIVE       = 0x0100;
        const INTERFACE    = 0x0200;
        const ABSTRACT     = 0x0400;
        const STRICT       = 0x0800;
        const SYNTHETIC    = 0x1000;
        const ANNOTATION   = 0x2000;
        const ENUM         = 0x4000;
        const MODULE       = 0x8000;

        const VISIBILITY = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
    }
}

/// A declared field: name, type descriptor and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    pub name: String,
    pub descriptor: String,
    pub access: AccessFlags,
}

/// A declared method: name, method descriptor and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodNode {
    pub name: String,
    pub descriptor: String,
    pub access: AccessFlags,
}

/// The mutable structural view of one class file that the transformer rewrites.
///
/// Decoding and re-encoding the binary class file is left to the caller.
///
/// # Example
///
/// ```
/// use access_transformer::{AccessFlags, ClassNode};
///
/// let class = ClassNode::new("net/example/Foo", AccessFlags::SUPER)
///     .field("count", "I", AccessFlags::PRIVATE)
///     .method("bar", "()V", AccessFlags::PRIVATE | AccessFlags::FINAL);
///
/// assert_eq!(class.fields.len(), 1);
/// assert_eq!(class.methods[0].name, "bar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    /// Internal name, e.g. `net/example/Foo`.
    pub name: String,
    pub access: AccessFlags,
    pub fields: Vec<FieldNode>,
    pub methods: Vec<MethodNode>,
}

impl ClassNode {
    pub fn new(name: impl Into<String>, access: AccessFlags) -> Self {
        Self {
            name: name.into(),
            access,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, name: &str, descriptor: &str, access: AccessFlags) -> Self {
        self.fields.push(FieldNode {
            name: name.to_owned(),
            descriptor: descriptor.to_owned(),
            access,
        });
        self
    }

    #[must_use]
    pub fn method(mut self, name: &str, descriptor: &str, access: AccessFlags) -> Self {
        self.methods.push(MethodNode {
            name: name.to_owned(),
            descriptor: descriptor.to_owned(),
            access,
        });
        self
    }
}
