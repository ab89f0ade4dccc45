//! Filter language for selecting OSM objects.
//!
//! Syntax:
//!   point, way, relation        - object type
//!   tag                         - tag exists
//!   tag=value, tag!=value       - tag value comparison
//!   tag~regex, tag!~regex       - tag value regex match (`=~` is the same as `~`)
//!   tag~'regex'i                - case-insensitive regex match
//!   @type=way                   - object type as an attribute
//!   @id>100, 5<=@version        - integer attribute comparison
//!                                 (@id, @version, @uid, @changeset, @ref)
//!   @user=name, @role~regex     - string attribute comparison
//!                                 (@user, @key, @value, @role)
//!   @tags[expr]                 - expr applied to the tag list
//!   @nodes[expr]                - expr applied to a way's nodes
//!   @members[expr]              - expr applied to a relation's members
//!   @nodes[expr] >= 2           - scopes can be integer operands
//!   not expr                    - NOT
//!   expr1 and expr2             - AND
//!   expr1 or expr2              - OR (lower precedence than and)
//!   (expr)                      - grouping
//!   # comment                   - ignored up to end of line
//!
//! Strings are either plain (`[a-zA-Z][a-zA-Z0-9:_]*`) or single/double quoted
//! without escapes. The words `point`, `way` and `relation` always mean an
//! object type when written bare; quote them to test for a tag of that name.

mod ast;
mod build;
mod error;
mod lexer;
mod parser;
mod print;

pub use ast::*;
pub use error::{Expected, FilterSyntaxError};
pub use parser::{parse_filter, parse_filter_with};
