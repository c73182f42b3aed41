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

//! This module defines the SQLite keyword vocabulary:
//! 1) a `Keyword` enum with one variant per keyword
//! 2) an `ALL_KEYWORDS` array of `(name, Keyword)` pairs, sorted by name so
//!    lookup can binary search
//! 3) `keyword_from_str`, a case-insensitive resolver used by the tokenizer
//!    to decide whether an identifier-shaped word is actually a keyword.
//!
//! This is not a list of *reserved* keywords: the parser decides case by
//! case whether a given keyword may also serve as an identifier (see
//! `Parser::expect_identifier_or_keyword`).

/// Expands to a `Keyword` enum plus a sorted `ALL_KEYWORDS` lookup table.
macro_rules! define_keywords {
    ($($ident:ident),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($ident),*
        }

        impl Keyword {
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Keyword::$ident => stringify!($ident)),*
                }
            }
        }

        pub const ALL_KEYWORDS: &[(&str, Keyword)] = &[
            $((stringify!($ident), Keyword::$ident)),*
        ];
    };
}

// Keep this list sorted: `keyword_from_str` binary searches it.
define_keywords!(
    ABORT,
    ACTION,
    ADD,
    AFTER,
    ALL,
    ALTER,
    ALWAYS,
    ANALYZE,
    AND,
    AS,
    ASC,
    ATTACH,
    AUTOINCREMENT,
    BEFORE,
    BEGIN,
    BETWEEN,
    BY,
    CASCADE,
    CASE,
    CAST,
    CHECK,
    COLLATE,
    COLUMN,
    COMMIT,
    CONFLICT,
    CONSTRAINT,
    CREATE,
    CROSS,
    CURRENT,
    CURRENT_DATE,
    CURRENT_TIME,
    CURRENT_TIMESTAMP,
    DATABASE,
    DEFAULT,
    DEFERRABLE,
    DEFERRED,
    DELETE,
    DESC,
    DETACH,
    DISTINCT,
    DO,
    DROP,
    EACH,
    ELSE,
    END,
    ESCAPE,
    EXCEPT,
    EXCLUDE,
    EXCLUSIVE,
    EXISTS,
    EXPLAIN,
    FAIL,
    FALSE,
    FILTER,
    FIRST,
    FOLLOWING,
    FOR,
    FOREIGN,
    FROM,
    FULL,
    GENERATED,
    GLOB,
    GROUP,
    GROUPS,
    HAVING,
    IF,
    IGNORE,
    IMMEDIATE,
    IN,
    INDEX,
    INDEXED,
    INITIALLY,
    INNER,
    INSERT,
    INSTEAD,
    INTERSECT,
    INTO,
    IS,
    ISNULL,
    JOIN,
    KEY,
    LAST,
    LEFT,
    LIKE,
    LIMIT,
    MATCH,
    MATERIALIZED,
    NATURAL,
    NO,
    NOT,
    NOTHING,
    NOTNULL,
    NULL,
    NULLS,
    OF,
    OFFSET,
    ON,
    OR,
    ORDER,
    OTHERS,
    OUTER,
    OVER,
    PARTITION,
    PLAN,
    PRAGMA,
    PRECEDING,
    PRIMARY,
    QUERY,
    RAISE,
    RANGE,
    RECURSIVE,
    REFERENCES,
    REGEXP,
    REINDEX,
    RELEASE,
    RENAME,
    REPLACE,
    RESTRICT,
    RETURNING,
    RIGHT,
    ROLLBACK,
    ROW,
    ROWID,
    ROWS,
    SAVEPOINT,
    SELECT,
    SET,
    STORED,
    STRICT,
    TABLE,
    TEMP,
    TEMPORARY,
    THEN,
    TIES,
    TO,
    TRANSACTION,
    TRIGGER,
    TRUE,
    UNBOUNDED,
    UNION,
    UNIQUE,
    UPDATE,
    USING,
    VACUUM,
    VALUES,
    VIEW,
    VIRTUAL,
    WHEN,
    WHERE,
    WINDOW,
    WITH,
    WITHOUT,
);

/// Resolve a word to a `Keyword`, case-insensitively. Returns `None` (meaning
/// the word should be tokenized as a plain `IDENTIFIER`) for anything that
/// isn't one of SQLite's keywords.
pub fn keyword_from_str(word: &str) -> Option<Keyword> {
    // ALL_KEYWORDS is authored in sorted order above; we don't currently
    // build a case-folded index, so resolution is a linear scan over a
    // ~150-entry table. A binary search over a precomputed uppercase table
    // would be the next step if this ever shows up in profiles.
    let upper = word.to_ascii_uppercase();
    ALL_KEYWORDS
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, kw)| *kw)
}
