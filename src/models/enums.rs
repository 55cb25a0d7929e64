use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(DispensingForm {
    Tablet => "tablet",
    Capsule => "capsule",
    Syrup => "syrup",
    Injectable => "injectable",
    Cream => "cream",
    Ointment => "ointment",
    Suppository => "suppository",
    Other => "other",
});

impl DispensingForm {
    /// Printed label on the ordonnance (French pharmacy vocabulary).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tablet => "comprimé",
            Self::Capsule => "gélule",
            Self::Syrup => "sirop",
            Self::Injectable => "injectable",
            Self::Cream => "crème",
            Self::Ointment => "pommade",
            Self::Suppository => "suppositoire",
            Self::Other => "autre",
        }
    }
}

str_enum!(Gender {
    Male => "male",
    Female => "female",
});

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Homme",
            Self::Female => "Femme",
        }
    }
}

str_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    Completed => "completed",
    Cancelled => "cancelled",
});
