/// Declare a closed enum stored and transmitted by its variant name.
///
/// Generates `ALL`, `as_str`, `Display` and a `FromStr` that fails with
/// `ContractError::InvalidValue` naming the field. Ordering follows
/// declaration order, not the name.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::ContractError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    other => Err($crate::errors::ContractError::InvalidValue {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use named_enum;

pub mod contract;
pub mod events;
pub mod requests;

pub use contract::{
    AmendmentType, Contract, ContractContent, ContractData, ContractStatus, ContractType,
    FundingType,
};
pub use events::{
    AuditRecord, AuditSeverity, ContractAction, ContractStatusChangeEvent, StatusTransition,
};
pub use requests::{ApprovalRequest, ContractRequest, CreateContractRequest, WithdrawalRequest};
