//! Filter helpers: SQL `WHERE` building and the equivalent in-memory checks

use sqlx::{Encode, Postgres, QueryBuilder, Type};

/// Appends `WHERE ... AND ...` clauses to a query under construction
pub struct Conditions<'q, 'args> {
    builder: &'q mut QueryBuilder<'args, Postgres>,
    count: usize,
}

impl<'q, 'args> Conditions<'q, 'args> {
    pub fn new(builder: &'q mut QueryBuilder<'args, Postgres>) -> Self {
        Self { builder, count: 0 }
    }

    fn next_clause(&mut self) {
        self.builder.push(if self.count == 0 { " WHERE " } else { " AND " });
        self.count += 1;
    }

    /// `column = value` when a value is given
    pub fn eq<T>(&mut self, column: &str, value: Option<T>)
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres>,
    {
        if let Some(value) = value {
            self.next_clause();
            self.builder.push(column).push(" = ").push_bind(value);
        }
    }

    /// Case-insensitive substring match on any of `columns`
    pub fn search(&mut self, columns: &[&str], term: Option<&str>) {
        let Some(term) = normalize_term(term) else {
            return;
        };
        let pattern = format!("%{}%", escape_like(term));

        self.next_clause();
        self.builder.push("(");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                self.builder.push(" OR ");
            }
            self.builder
                .push(*column)
                .push(" ILIKE ")
                .push_bind(pattern.clone());
        }
        self.builder.push(")");
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

fn normalize_term(term: Option<&str>) -> Option<&str> {
    term.map(str::trim).filter(|t| !t.is_empty())
}

/// Escapes the LIKE metacharacters so the term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// In-memory counterpart of [`Conditions::search`]
pub fn text_matches(term: Option<&str>, fields: &[Option<&str>]) -> bool {
    let Some(term) = normalize_term(term) else {
        return true;
    };
    let needle = term.to_lowercase();
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// In-memory counterpart of [`Conditions::eq`] on a required column
pub fn eq_matches<T: PartialEq + ?Sized>(wanted: Option<&T>, actual: &T) -> bool {
    wanted.is_none_or(|wanted| wanted == actual)
}

/// In-memory counterpart of [`Conditions::eq`] on a nullable column
pub fn opt_eq_matches<T: PartialEq + ?Sized>(wanted: Option<&T>, actual: Option<&T>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual == Some(wanted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_matches_is_case_insensitive_substring() {
        let fields = [Some("Riverside Office Tower"), None, Some("Downtown")];
        assert!(text_matches(Some("office"), &fields));
        assert!(text_matches(Some("DOWN"), &fields));
        assert!(!text_matches(Some("bridge"), &fields));
        assert!(text_matches(None, &fields));
        assert!(text_matches(Some("   "), &fields));
    }

    #[test]
    fn test_eq_matches() {
        assert!(eq_matches(None, "active"));
        assert!(eq_matches(Some("active"), "active"));
        assert!(!eq_matches(Some("draft"), "active"));
        assert!(opt_eq_matches::<str>(None, None));
        assert!(!opt_eq_matches(Some("1"), None));
        assert!(opt_eq_matches(Some("1"), Some("1")));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn test_conditions_build_where_clause() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM projects");
        {
            let mut conditions = Conditions::new(&mut builder);
            conditions.search(&["name", "location"], Some("tower"));
            conditions.eq("client_id", Some("2".to_string()));
            conditions.eq::<String>("status", None);
            assert!(!conditions.is_empty());
        }
        assert_eq!(
            builder.sql(),
            "SELECT id FROM projects WHERE (name ILIKE $1 OR location ILIKE $2) AND client_id = $3"
        );
    }
}
