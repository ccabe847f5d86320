// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Error` struct and the `ErrorKind` enum, which are
//! used to represent errors that can occur in the library.

/// A macro for defining the `ErrorKind` enum, the `Display` implementation for
/// it, and the constructors for the `Error` struct.
macro_rules! ErrorKind {
    ($(
        ($kind:ident, $ctor:ident)
    ),*) => {
        /// The kind of error that occurred.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub(crate) enum ErrorKind {
            $(
                $kind,
            )*
        }

        impl std::fmt::Display for ErrorKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$kind => write!(f, "{}", stringify!($kind)),
                    )*
                }
            }
        }

        /// Constructors for [`Error`].
        impl Error {
            $(
                #[doc = concat!(
                    "Creates a new [`Error`] with the `",
                    stringify!($kind),
                    "` kind and the given description."
                )]
                pub(crate) fn $ctor(desc: impl Into<String>) -> crate::Error {
                    Self {
                        kind: ErrorKind::$kind,
                        desc: desc.into(),
                    }
                }
            )*
        }
    };
}

ErrorKind!(
    (ConservationViolation, conservation_violation),
    (InvalidConfig, invalid_config),
    (NodeNotFound, node_not_found)
);

/// An error returned by configuration validation, by explicit conservation
/// checks on a [`FlowDecomposition`][crate::FlowDecomposition], or by node
/// lookups on a [`DiagramModel`][crate::DiagramModel].
///
/// Measurement data itself never produces an `Error`: bad values are clamped
/// and degenerate totals yield the "no flow" state.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    desc: String,
}

impl Error {
    /// Returns the human readable description of the error.
    pub fn description(&self) -> &str {
        &self.desc
    }

    /// Returns true if the error was raised by a conservation check.
    pub fn is_conservation_violation(&self) -> bool {
        self.kind == ErrorKind::ConservationViolation
    }

    /// Returns true if the error was raised by configuration validation.
    pub fn is_invalid_config(&self) -> bool {
        self.kind == ErrorKind::InvalidConfig
    }

    /// Returns true if the error was raised by a lookup of an absent node.
    pub fn is_node_not_found(&self) -> bool {
        self.kind == ErrorKind::NodeNotFound
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.desc)
    }
}

impl std::error::Error for Error {}
