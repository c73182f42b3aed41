// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Binary and unary operators, and the precedence table that drives the
//! parser's precedence-climbing expression parser.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
    BitwiseNot,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "NOT",
            UnaryOperator::BitwiseNot => "~",
        };
        write!(f, "{s}")
    }
}

/// A binary operator.
///
/// `IsNot` (`IS NOT`) is its own variant rather than being encoded as
/// `Not(Is(..))`: SQLite treats `IS NOT` as a single comparison operator at
/// the token level (two keywords, one operator), and keeping it as one enum
/// value avoids a `UnaryExpression(Not, BinaryExpression(Is, ..))` shape
/// that nothing else in this grammar uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    StringConcat,

    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    Is,
    IsNot,

    And,
    Or,

    BitwiseAnd,
    BitwiseOr,
    BitwiseShiftLeft,
    BitwiseShiftRight,

    JsonExtract,     // ->
    JsonExtractText, // ->>
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::StringConcat => "||",
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::Is => "IS",
            BinaryOperator::IsNot => "IS NOT",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseShiftLeft => "<<",
            BinaryOperator::BitwiseShiftRight => ">>",
            BinaryOperator::JsonExtract => "->",
            BinaryOperator::JsonExtractText => "->>",
        };
        write!(f, "{s}")
    }
}

/// Binding power for `BinaryOperator`, matching the original grammar's
/// `PRECEDENCE` table. Higher binds tighter. `BETWEEN`, `IN`, and the
/// `LIKE` family share a band with the comparison operators.
pub fn precedence(op: BinaryOperator) -> u8 {
    use BinaryOperator::*;
    match op {
        Or => 1,
        And => 2,
        Eq | NotEq | Lt | Gt | LtEq | GtEq | Is | IsNot => 4,
        BitwiseShiftLeft | BitwiseShiftRight | BitwiseAnd | BitwiseOr => 5,
        Plus | Minus | StringConcat => 6,
        Multiply | Divide | Modulo => 7,
        JsonExtract | JsonExtractText => 8,
    }
}

/// Precedence assigned to `BETWEEN` and `IN`, which parse like comparison
/// operators but aren't representable as a plain `BinaryOperator` (their
/// right-hand side isn't a single expression).
pub const BETWEEN_IN_PRECEDENCE: u8 = 4;

/// Precedence used while scanning a window frame's `BETWEEN x AND y`
/// boundary: parsing the first boundary at `BETWEEN_IN_PRECEDENCE + 1`
/// stops it from greedily consuming the `AND` that separates the two
/// boundaries, the same trick the grammar's frame-boundary parser relies on.
pub const FRAME_BOUNDARY_PRECEDENCE: u8 = BETWEEN_IN_PRECEDENCE + 1;

/// Precedence of a prefix `NOT`, between `AND` and the comparison band so
/// that `NOT a = b` binds as `NOT (a = b)` while `a AND NOT b` binds as
/// `a AND (NOT b)`.
pub const NOT_PRECEDENCE: u8 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_binds_looser_than_and() {
        assert!(precedence(BinaryOperator::Or) < precedence(BinaryOperator::And));
    }

    #[test]
    fn multiplicative_binds_tighter_than_additive() {
        assert!(precedence(BinaryOperator::Multiply) > precedence(BinaryOperator::Plus));
    }
}
