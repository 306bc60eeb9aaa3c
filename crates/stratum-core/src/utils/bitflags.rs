// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A macro to define bitflags in a structured way.
//!
//! Every generated type gets the named constants, an `EMPTY` and an `ALL`
//! constant, set-style helpers, and the bitwise operators. The `Debug` output
//! lists the set flag names, e.g. `ChangeMask { INDEX_BUFFER | PS_SAMPLERS }`.

#[macro_export]
#[doc(hidden)]
macro_rules! stratum_bitflags {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$flag_attr:meta])*
                const $flag_name:ident = $flag_value:expr;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            bits: $ty,
        }

        impl $name {
            /// An empty set of flags.
            pub const EMPTY: Self = Self { bits: 0 };

            /// The union of every named flag.
            pub const ALL: Self = Self { bits: 0 $(| $flag_value)* };

            // Define the individual flag constants
            $(
                $(#[$flag_attr])*
                pub const $flag_name: Self = Self { bits: $flag_value };
            )*

            /// Creates a new bitflag set from the given raw bits.
            /// Bits not corresponding to any defined flag are kept.
            pub const fn from_bits_truncate(bits: $ty) -> Self {
                Self { bits }
            }

            /// Returns the raw value of the bitflag set.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// Returns `true` if no flag is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// Returns `true` if every named flag is set.
            pub const fn is_all(&self) -> bool {
                (self.bits & Self::ALL.bits) == Self::ALL.bits
            }

            /// Returns `true` if all flags in `other` are contained within `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// Returns `true` if any flag in `other` is contained within `self`.
            pub const fn intersects(&self, other: Self) -> bool {
                (self.bits & other.bits) != 0
            }

            /// Inserts the flags in `other` into `self`.
            pub fn insert(&mut self, other: Self) {
                self.bits |= other.bits;
            }

            /// Removes the flags in `other` from `self`.
            pub fn remove(&mut self, other: Self) {
                self.bits &= !other.bits;
            }

            /// Inserts or removes `other` depending on `value`.
            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }

            /// Returns a new `Self` with `other` flags inserted.
            #[must_use]
            pub const fn with(mut self, other: Self) -> Self {
                self.bits |= other.bits;
                self
            }

            /// Returns a new `Self` with `other` flags removed.
            #[must_use]
            pub const fn without(mut self, other: Self) -> Self {
                self.bits &= !other.bits;
                self
            }
        }

        impl ::core::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }
        }

        impl ::core::ops::BitAnd for $name {
            type Output = Self;
            fn bitand(self, other: Self) -> Self {
                Self { bits: self.bits & other.bits }
            }
        }

        impl ::core::ops::Not for $name {
            type Output = Self;
            fn not(self) -> Self {
                Self { bits: !self.bits & Self::ALL.bits }
            }
        }

        impl ::core::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, other: Self) {
                self.bits |= other.bits;
            }
        }

        impl ::core::ops::BitAndAssign for $name {
            fn bitand_assign(&mut self, other: Self) {
                self.bits &= other.bits;
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                let mut bits = self.bits;
                let mut first_flag = true;

                write!(f, "{} {{ ", stringify!($name))?;

                $(
                    if ($flag_value != 0) && (bits & $flag_value) == $flag_value {
                        if !first_flag {
                            write!(f, " | ")?;
                        }
                        write!(f, "{}", stringify!($flag_name))?;
                        bits &= !$flag_value;
                        first_flag = false;
                    }
                )*

                if bits != 0 {
                    if !first_flag {
                        write!(f, " | ")?;
                    }
                    write!(f, "UNKNOWN({:#x})", bits)?;
                    first_flag = false;
                }

                if first_flag {
                    write!(f, "EMPTY")?;
                }

                write!(f, " }}")
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::stratum_bitflags;

    stratum_bitflags! {
        /// Flags used to exercise the macro.
        pub struct DirtyGroups: u16 {
            const TARGETS = 1 << 0;
            const BUFFERS = 1 << 1;
            const VIEWS = 1 << 2;
            const SAMPLERS = 1 << 9;
        }
    }

    #[test]
    fn empty_and_all() {
        assert!(DirtyGroups::EMPTY.is_empty());
        assert_eq!(DirtyGroups::default(), DirtyGroups::EMPTY);
        assert_eq!(DirtyGroups::ALL.bits(), 0b10_0000_0111);
        assert!(DirtyGroups::ALL.is_all());
        assert!(!DirtyGroups::TARGETS.is_all());
        assert_eq!(format!("{:?}", DirtyGroups::EMPTY), "DirtyGroups { EMPTY }");
    }

    #[test]
    fn set_operations() {
        let mut flags = DirtyGroups::TARGETS | DirtyGroups::VIEWS;
        assert!(flags.contains(DirtyGroups::VIEWS));
        assert!(!flags.contains(DirtyGroups::BUFFERS));
        assert!(flags.intersects(DirtyGroups::VIEWS | DirtyGroups::SAMPLERS));

        flags.set(DirtyGroups::SAMPLERS, true);
        flags.remove(DirtyGroups::TARGETS);
        assert_eq!(flags, DirtyGroups::VIEWS | DirtyGroups::SAMPLERS);
        assert_eq!(format!("{:?}", flags), "DirtyGroups { VIEWS | SAMPLERS }");

        flags.set(DirtyGroups::VIEWS, false);
        assert_eq!(flags, DirtyGroups::SAMPLERS);
    }

    #[test]
    fn not_stays_within_named_flags() {
        let inverted = !DirtyGroups::BUFFERS;
        assert_eq!(
            inverted,
            DirtyGroups::TARGETS | DirtyGroups::VIEWS | DirtyGroups::SAMPLERS
        );
        assert!((!DirtyGroups::ALL).is_empty());
    }

    #[test]
    fn unknown_bits_are_reported() {
        let flags = DirtyGroups::from_bits_truncate(0b1000 | 0b1);
        assert_eq!(format!("{:?}", flags), "DirtyGroups { TARGETS | UNKNOWN(0x8) }");
        assert_eq!(
            DirtyGroups::BUFFERS.with(DirtyGroups::VIEWS).without(DirtyGroups::BUFFERS),
            DirtyGroups::VIEWS
        );
    }
}
