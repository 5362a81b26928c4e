//! Method body access.

use std::fmt;

use crate::resolver::{MetadataMap, SymbolResolver};

/// ECMA-335 `MethodImplAttributes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodImplFlags(pub u16);

impl MethodImplFlags {
    /// Mask for the code type bits.
    pub const CODE_TYPE_MASK: u16 = 0x0003;
    /// Body is CIL.
    pub const IL: u16 = 0x0000;
    /// Body is native code.
    pub const NATIVE: u16 = 0x0001;
    /// Body is optimized CIL.
    pub const OPTIL: u16 = 0x0002;
    /// Body is provided by the runtime.
    pub const RUNTIME: u16 = 0x0003;
    /// Method is unmanaged.
    pub const UNMANAGED: u16 = 0x0004;
    /// Method cannot be inlined.
    pub const NO_INLINING: u16 = 0x0008;
    /// Single-threaded through the body.
    pub const SYNCHRONIZED: u16 = 0x0020;
    /// Signature is exported exactly as declared (P/Invoke).
    pub const PRESERVE_SIG: u16 = 0x0080;
    /// Implemented inside the runtime.
    pub const INTERNAL_CALL: u16 = 0x1000;

    /// Returns the code type bits.
    pub const fn code_type(&self) -> u16 {
        self.0 & Self::CODE_TYPE_MASK
    }

    /// Returns true if every bit of `flag` is set.
    pub const fn has(&self, flag: u16) -> bool {
        self.0 & flag == flag
    }

    /// Returns true if the method carries a managed CIL body.
    pub const fn is_il(&self) -> bool {
        self.code_type() == Self::IL && !self.has(Self::UNMANAGED) && !self.has(Self::INTERNAL_CALL)
    }
}

impl fmt::Display for MethodImplFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code_type = match self.code_type() {
            Self::IL => "IL",
            Self::NATIVE => "Native",
            Self::OPTIL => "OPTIL",
            _ => "Runtime",
        };
        f.write_str(code_type)?;
        for (flag, name) in [
            (Self::UNMANAGED, "Unmanaged"),
            (Self::NO_INLINING, "NoInlining"),
            (Self::SYNCHRONIZED, "Synchronized"),
            (Self::PRESERVE_SIG, "PreserveSig"),
            (Self::INTERNAL_CALL, "InternalCall"),
        ] {
            if self.has(flag) {
                write!(f, ", {name}")?;
            }
        }
        Ok(())
    }
}

/// A method whose CIL body can be disassembled.
pub trait MethodBody {
    /// Implementation flags of the method.
    fn impl_flags(&self) -> MethodImplFlags;

    /// Raw CIL bytes, or `None` when the method has no body
    /// (extern, abstract, P/Invoke).
    fn il_bytes(&self) -> Option<&[u8]>;

    /// Resolver for the tokens the body refers to.
    fn resolver(&self) -> &dyn SymbolResolver;
}

/// A method body held in memory together with its metadata.
#[derive(Debug, Clone, Default)]
pub struct OwnedMethod {
    pub flags: MethodImplFlags,
    pub body: Option<Vec<u8>>,
    pub metadata: MetadataMap,
}

impl OwnedMethod {
    /// Creates a managed CIL method.
    pub fn il(body: impl Into<Vec<u8>>, metadata: MetadataMap) -> Self {
        Self {
            flags: MethodImplFlags(MethodImplFlags::IL),
            body: Some(body.into()),
            metadata,
        }
    }

    /// Creates a method without a body, as for `extern` declarations.
    pub fn external(flags: MethodImplFlags) -> Self {
        Self {
            flags,
            body: None,
            metadata: MetadataMap::new(),
        }
    }
}

impl MethodBody for OwnedMethod {
    fn impl_flags(&self) -> MethodImplFlags {
        self.flags
    }

    fn il_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    fn resolver(&self) -> &dyn SymbolResolver {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_type() {
        assert!(MethodImplFlags(MethodImplFlags::IL).is_il());
        assert!(MethodImplFlags(MethodImplFlags::NO_INLINING).is_il());
        assert!(!MethodImplFlags(MethodImplFlags::NATIVE).is_il());
        assert!(!MethodImplFlags(MethodImplFlags::RUNTIME).is_il());
        assert!(!MethodImplFlags(MethodImplFlags::INTERNAL_CALL).is_il());
        assert!(!MethodImplFlags(MethodImplFlags::UNMANAGED).is_il());
    }

    #[test]
    fn test_display() {
        assert_eq!(MethodImplFlags(0).to_string(), "IL");
        assert_eq!(
            MethodImplFlags(MethodImplFlags::PRESERVE_SIG).to_string(),
            "IL, PreserveSig"
        );
        assert_eq!(
            MethodImplFlags(MethodImplFlags::RUNTIME | MethodImplFlags::INTERNAL_CALL)
                .to_string(),
            "Runtime, InternalCall"
        );
    }

    #[test]
    fn test_flags_display_in_value_order() {
        let flags = MethodImplFlags(
            MethodImplFlags::INTERNAL_CALL
                | MethodImplFlags::SYNCHRONIZED
                | MethodImplFlags::NO_INLINING,
        );
        assert_eq!(
            flags.to_string(),
            "IL, NoInlining, Synchronized, InternalCall"
        );
        assert!(flags.has(MethodImplFlags::SYNCHRONIZED));
        assert!(!flags.is_il());

        let synchronized = MethodImplFlags(MethodImplFlags::SYNCHRONIZED);
        assert!(synchronized.is_il());
    }

    #[test]
    fn test_owned_method() {
        let method = OwnedMethod::il(vec![0x2A], MetadataMap::new());
        assert_eq!(method.il_bytes(), Some(&[0x2A][..]));
        assert!(method.impl_flags().is_il());

        let external = OwnedMethod::external(MethodImplFlags(MethodImplFlags::PRESERVE_SIG));
        assert!(external.il_bytes().is_none());
    }
}
