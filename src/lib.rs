//! Parser for the OSM object filter language.
//!
//! A filter such as `way and highway=primary and @version>2` is compiled into
//! an [`Expr`] tree that an evaluator can match against map objects.
//!
//! ```
//! use osm_object_filter::{Expr, ObjectType, parse_filter};
//!
//! let expr = parse_filter("not point").unwrap();
//! assert_eq!(expr, Expr::Not(Box::new(Expr::ObjectTypeCheck(ObjectType::Point))));
//! ```

pub mod config;
pub mod dsl;

pub use config::ParseOptions;
pub use dsl::{Expected, Expr, FilterSyntaxError, ObjectType, parse_filter, parse_filter_with};
