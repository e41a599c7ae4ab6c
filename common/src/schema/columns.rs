use super::descriptor::SchemaDescriptor;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static STRING_LITERAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"'(?:[^']|'')*'").unwrap());

const CONSTRAINT_KEYWORDS: &[&str] = &["constraint", "primary", "foreign", "unique", "check"];

/// declared columns per table, keyed by lowercased table name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnCatalog {
    tables: BTreeMap<String, Vec<String>>,
}

impl ColumnCatalog {
    pub fn from_schema(schema: &SchemaDescriptor) -> Self {
        let tables = schema
            .tables
            .iter()
            .map(|t| (t.name.to_lowercase(), parse_column_names(&t.sql)))
            .collect();

        Self { tables }
    }

    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.tables.get(&table.to_lowercase()).map(Vec::as_slice)
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(&table.to_lowercase())
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.columns(table)
            .map(|cols| cols.iter().any(|c| c.eq_ignore_ascii_case(column)))
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.tables.iter().map(|(t, c)| (t.as_str(), c.as_slice()))
    }

    /// Tables and `qualifier.column` references the schema does not declare.
    ///
    /// Tables named after `FROM`/`JOIN`/`INTO`/`UPDATE` must be declared (or be a
    /// CTE or an `sqlite_` builtin). Qualifiers resolve through the aliases those
    /// clauses introduce; columns of CTEs and subqueries are not checked. String
    /// literals are ignored. Unknown tables are reported by name, unknown
    /// columns as `qualifier.column`, in order of first appearance.
    pub fn unknown_references(&self, sql: &str) -> Vec<String> {
        let stripped = STRING_LITERAL_REGEX.replace_all(sql, "''");
        let tokens: Vec<Token<'_>> = TOKEN_REGEX
            .find_iter(&stripped)
            .map(|m| Token::from_text(m.as_str()))
            .collect();

        let scope = SourceScope::collect(&tokens);
        let mut unknown: Vec<String> = Vec::new();
        let mut report = |item: String| {
            if !unknown.contains(&item) {
                unknown.push(item);
            }
        };

        for table in &scope.tables {
            if !self.is_known_source(table, &scope) {
                report(table.clone());
            }
        }

        for window in tokens.windows(3) {
            let [Token::Ident(qualifier), Token::Punct('.'), Token::Ident(column)] = window else {
                continue;
            };
            let qualifier = qualifier.to_lowercase();

            let target = match scope.aliases.get(&qualifier) {
                Some(Source::Table(table)) => table.clone(),
                Some(Source::Opaque) => continue,
                None if scope.ctes.contains(&qualifier) || is_builtin(&qualifier) => continue,
                None => qualifier.clone(),
            };

            if !self.has_column(&target, column) {
                report(format!("{}.{}", qualifier, column));
            }
        }

        unknown
    }

    fn is_known_source(&self, table: &str, scope: &SourceScope) -> bool {
        self.has_table(table) || scope.ctes.iter().any(|c| c == table) || is_builtin(table)
    }
}

static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[A-Za-z_][A-Za-z0-9_]*|"[^"]*"|`[^`]*`|\[[^\]]*\]|\S"#).unwrap());

const SOURCE_KEYWORDS: &[&str] = &["from", "join", "into", "update"];

const RESERVED_WORDS: &[&str] = &[
    "all", "and", "as", "by", "cross", "default", "except", "from", "full", "group", "having",
    "indexed", "inner", "intersect", "join", "left", "limit", "natural", "not", "offset", "on",
    "or", "order", "outer", "returning", "right", "select", "set", "union", "using", "values",
    "where", "window",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Punct(char),
}

impl<'a> Token<'a> {
    fn from_text(text: &'a str) -> Self {
        let first = text.chars().next().unwrap_or(' ');
        match first {
            '"' | '`' | '[' if text.len() >= 2 => Token::Ident(&text[1..text.len() - 1]),
            c if c == '_' || c.is_ascii_alphabetic() => Token::Ident(text),
            c => Token::Punct(c),
        }
    }

    fn keyword(&self, word: &str) -> bool {
        matches!(self, Token::Ident(ident) if ident.eq_ignore_ascii_case(word))
    }

    /// identifier usable as a table name or alias
    fn name(&self) -> Option<&'a str> {
        match *self {
            Token::Ident(ident) if !RESERVED_WORDS.contains(&ident.to_lowercase().as_str()) => {
                Some(ident)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Table(String),
    /// subquery or CTE; its columns are not known statically
    Opaque,
}

/// row sources a statement reads from or writes to, lowercased
#[derive(Debug, Default)]
struct SourceScope {
    tables: Vec<String>,
    aliases: BTreeMap<String, Source>,
    ctes: Vec<String>,
}

impl SourceScope {
    fn collect(tokens: &[Token<'_>]) -> Self {
        let mut scope = SourceScope::default();

        // `name AS (` introduces a common table expression
        for window in tokens.windows(3) {
            if let (Some(name), true, Token::Punct('(')) = (window[0].name(), window[1].keyword("as"), window[2]) {
                scope.ctes.push(name.to_lowercase());
            }
        }

        let mut idx = 0;
        while idx < tokens.len() {
            let token = tokens[idx];
            idx += 1;

            if token == Token::Punct(')') {
                // `(...) [AS] alias` names a derived table
                if let Some(alias) = alias_at(tokens, &mut idx) {
                    scope.aliases.entry(alias).or_insert(Source::Opaque);
                }
                continue;
            }

            let is_from = token.keyword("from");
            if !SOURCE_KEYWORDS.iter().any(|k| token.keyword(k)) {
                continue;
            }

            loop {
                let Some(table) = tokens.get(idx).and_then(Token::name) else {
                    break;
                };
                idx += 1;

                let table = table.to_lowercase();
                if !scope.tables.contains(&table) {
                    scope.tables.push(table.clone());
                }

                let source = if scope.ctes.contains(&table) || is_builtin(&table) {
                    Source::Opaque
                } else {
                    Source::Table(table.clone())
                };
                if let Some(alias) = alias_at(tokens, &mut idx) {
                    scope.aliases.insert(alias, source.clone());
                }
                scope.aliases.insert(table, source);

                // comma-separated sources only follow FROM
                if is_from && tokens.get(idx) == Some(&Token::Punct(',')) {
                    idx += 1;
                } else {
                    break;
                }
            }
        }

        scope
    }
}

/// optional `[AS] alias` at `idx`, advancing past it when present
fn alias_at(tokens: &[Token<'_>], idx: &mut usize) -> Option<String> {
    let mut at = *idx;
    let explicit = tokens.get(at).map(|t| t.keyword("as")).unwrap_or(false);
    if explicit {
        at += 1;
    }

    let alias = tokens.get(at).and_then(Token::name)?;
    if explicit || tokens.get(at + 1) != Some(&Token::Punct('(')) {
        *idx = at + 1;
        Some(alias.to_lowercase())
    } else {
        None
    }
}

fn is_builtin(name: &str) -> bool {
    let name = name.to_lowercase();
    name.starts_with("sqlite_") || name.starts_with("pragma_")
}

/// column names declared in a `CREATE TABLE` statement, in declaration order
pub fn parse_column_names(create_sql: &str) -> Vec<String> {
    let (Some(open), Some(close)) = (create_sql.find('('), create_sql.rfind(')')) else {
        return Vec::new();
    };
    if close <= open {
        return Vec::new();
    }

    split_top_level(&create_sql[open + 1..close])
        .into_iter()
        .filter_map(|item| {
            let first = item.split_whitespace().next()?;
            if CONSTRAINT_KEYWORDS.contains(&first.to_lowercase().as_str()) {
                return None;
            }
            let name = first.trim_matches(|c: char| matches!(c, '"' | '`' | '[' | ']'));
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

fn split_top_level(body: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in body.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(body[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    items.push(body[start..].trim());

    items.into_iter().filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::descriptor::TableDefinition;

    fn catalog() -> ColumnCatalog {
        ColumnCatalog::from_schema(&SchemaDescriptor::new(vec![
            TableDefinition {
                name: "artists".to_string(),
                sql: "CREATE TABLE artists (artist_id INTEGER PRIMARY KEY, name TEXT)".to_string(),
            },
            TableDefinition {
                name: "albums".to_string(),
                sql: "CREATE TABLE albums (\n    album_id INTEGER PRIMARY KEY AUTOINCREMENT,\n    artist_id INTEGER,\n    title TEXT,\n    FOREIGN KEY (artist_id) REFERENCES artists(artist_id)\n)".to_string(),
            },
        ]))
    }

    #[test]
    fn test_parse_column_names_skips_constraints() {
        let cols = catalog().columns("albums").unwrap().to_vec();
        assert_eq!(cols, vec!["album_id", "artist_id", "title"]);
    }

    #[test]
    fn test_parse_column_names_with_nested_parens() {
        let cols = parse_column_names(
            "CREATE TABLE t (\"price\" DECIMAL(10, 2), qty INTEGER CHECK (qty > 0), UNIQUE (price, qty))",
        );
        assert_eq!(cols, vec!["price", "qty"]);
    }

    #[test]
    fn test_parse_column_names_without_body() {
        assert!(parse_column_names("CREATE TABLE t AS SELECT 1").is_empty());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = catalog();
        assert!(catalog.has_table("ARTISTS"));
        assert!(catalog.has_column("Artists", "NAME"));
        assert!(!catalog.has_column("artists", "country"));
    }

    #[test]
    fn test_unknown_references() {
        let catalog = catalog();
        let sql = "SELECT artists.name, albums.release_year, a.whatever \
                   FROM artists JOIN albums ON artists.artist_id = albums.artist_id";

        assert_eq!(
            catalog.unknown_references(sql),
            vec!["albums.release_year", "a.whatever"]
        );
    }

    #[test]
    fn test_unknown_references_undeclared_table() {
        let catalog = catalog();

        assert_eq!(
            catalog.unknown_references("SELECT playlists.owner FROM playlists"),
            vec!["playlists", "playlists.owner"]
        );
        assert_eq!(
            catalog.unknown_references("SELECT name FROM artists JOIN playlists ON 1 = 1"),
            vec!["playlists"]
        );
        assert_eq!(
            catalog.unknown_references("INSERT INTO playlists (name) VALUES ('x')"),
            vec!["playlists"]
        );
    }

    #[test]
    fn test_unknown_references_resolves_aliases() {
        let catalog = catalog();

        assert_eq!(
            catalog.unknown_references("SELECT a.bogus FROM artists a"),
            vec!["a.bogus"]
        );
        assert!(catalog
            .unknown_references(
                "SELECT a.name AS artist_name, b.title AS album_title \
                 FROM artists AS a JOIN albums b ON a.artist_id = b.artist_id"
            )
            .is_empty());
    }

    #[test]
    fn test_unknown_references_comma_sources() {
        let sql = "SELECT x.name FROM artists x, albums y \
                   WHERE x.artist_id = y.artist_id AND y.nope = 1";
        assert_eq!(catalog().unknown_references(sql), vec!["y.nope"]);
    }

    #[test]
    fn test_unknown_references_skips_cte_and_subquery_columns() {
        let catalog = catalog();

        let cte = "WITH prolific AS (SELECT artist_id, count(*) AS n FROM albums GROUP BY artist_id) \
                   SELECT a.name, p.n FROM artists a JOIN prolific p ON a.artist_id = p.artist_id";
        assert!(catalog.unknown_references(cte).is_empty());

        let derived = "SELECT s.total FROM (SELECT count(*) AS total FROM albums) AS s";
        assert!(catalog.unknown_references(derived).is_empty());
    }

    #[test]
    fn test_unknown_references_allows_builtin_tables() {
        let sql = "SELECT m.name FROM sqlite_master m WHERE m.type = 'table'";
        assert!(catalog().unknown_references(sql).is_empty());
    }

    #[test]
    fn test_unknown_references_ignores_literals() {
        let catalog = catalog();
        let sql = "SELECT name FROM artists WHERE name = 'artists.bogus'";
        assert!(catalog.unknown_references(sql).is_empty());
    }
}
