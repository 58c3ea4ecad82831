#![doc = include_str!("../README.md")]

mod error;
mod format;
mod lex;
mod record;
mod schema;
mod specs;
mod view;

pub mod v1 {
    //! Versioned public API for the Perforce form model.
    //!
    //! Everything you need is re-exported from this module. Types are organized
    //! into four groups:
    //!
    //! # Form engine
    //!
    //! The generic, schema-driven record and its text format:
    //!
    //! - [`FormRecord`]: ordered field/value record with parse and serialize
    //! - [`FieldValue`]: scalar, multi-line text, or repeating list
    //! - [`FormatOptions`], [`LineEnding`]: output layout
    //!
    //! # Schemas
    //!
    //! - [`SpecSchema`]: recognized fields of one spec kind
    //! - [`SpecField`], [`FieldType`], [`FieldAccess`]: one field definition
    //!
    //! # View mappings
    //!
    //! - [`ViewMap`]: ordered mapping rules
    //! - [`ViewEntry`], [`MapType`]: one rule and its include/exclude/overlay type
    //! - [`split_view_line`]: tokenize a single mapping line
    //!
    //! # Typed specs
    //!
    //! Projections over a [`FormRecord`], all implementing [`Spec`]:
    //!
    //! - [`BranchSpec`], [`Depot`], [`Group`], [`Job`]
    //! - [`ProtectionTable`], [`TriggerTable`], [`TypeMap`]
    //! - [`ServerMetaData`], [`ClientMetadata`]: from `info` tagged output
    //!
    //! # Example: edit a group and write it back
    //!
    //! ```
    //! use p4form::v1::*;
    //!
    //! let text = "Group:\tdevs\n\nMaxResults:\tunset\n\nUsers:\n\talex\n\tbob\n";
    //! let mut group = Group::from_form_text(text).unwrap();
    //! assert_eq!(group.users(), vec!["alex", "bob"]);
    //!
    //! group.set_max_results(Limit::Value(50000));
    //! group.set_users(["alex", "bob", "carol"]);
    //!
    //! let out = group.to_string();
    //! assert!(out.contains("MaxResults:\t50000\n"));
    //! assert!(out.contains("\tcarol\n"));
    //! ```
    //!
    //! # Example: tagged output with scrambled list keys
    //!
    //! ```
    //! use p4form::v1::*;
    //!
    //! let group = Group::from_tagged([
    //!     ("Group", "devs"),
    //!     ("Users1", "bob"),
    //!     ("Users0", "alex"),
    //! ]);
    //! assert_eq!(group.users(), vec!["alex", "bob"]);
    //! ```

    pub use crate::error::{FormError, Result};
    pub use crate::format::{FormatOptions, LineEnding};
    pub use crate::record::{FieldValue, FormRecord};
    pub use crate::schema::{FieldAccess, FieldType, SpecField, SpecSchema};
    pub use crate::specs::{
        BranchSpec, ClientMetadata, DATE_FORMAT, Depot, DepotType, EntityType, Group, Job, Limit,
        ProtectionEntry, ProtectionTable, ServerMetaData, ServerVersion, Spec, TriggerEntry,
        TriggerTable, TypeMap, TypeMapEntry, format_date, parse_date,
    };
    pub use crate::view::{MapType, ViewEntry, ViewMap, split_view_line};
}
