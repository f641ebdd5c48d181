//! Variable Store & Expansion
//!
//! Canonical-case, case-insensitive-lookup variable namespace. System
//! names (`!`-prefixed) are readonly unless explicitly writable per the
//! system table; user names are created and typed on first write.

use indexmap::IndexMap;
use lazy_static::lazy_static;

use crate::error::EngineError;
use crate::extract::ExtractBuffer;

/// A variable's value. Legacy numeric coercion accepts decimal integers and
/// floats only; arrays are the `!COL*`/datasource row shape.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Array(Vec<String>),
}

impl VariableValue {
    /// Stringifies without locale formatting; arrays join with comma.
    pub fn stringify(&self) -> String {
        match self {
            VariableValue::Str(s) => s.clone(),
            VariableValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            VariableValue::Bool(b) => if *b { "YES".to_string() } else { "NO".to_string() },
            VariableValue::Array(items) => items.join(","),
        }
    }

    /// Infers a type from raw text: integer/decimal -> Number, YES/NO or
    /// TRUE/FALSE -> Bool, else Str. Used for user-variable creation, where
    /// the legacy engine has no declared schema to coerce against.
    fn infer(raw: &str) -> VariableValue {
        if let Ok(n) = raw.parse::<f64>() {
            return VariableValue::Number(n);
        }
        match raw.to_ascii_uppercase().as_str() {
            "YES" | "TRUE" => return VariableValue::Bool(true),
            "NO" | "FALSE" => return VariableValue::Bool(false),
            _ => {}
        }
        VariableValue::Str(raw.to_string())
    }
}

#[derive(Debug, Clone)]
struct VariableEntry {
    value: VariableValue,
    readonly: bool,
}

#[derive(Debug, Clone, Copy)]
enum SystemKind {
    Str,
    Number,
    Bool,
}

struct SystemSpec {
    default: &'static str,
    readonly: bool,
    kind: SystemKind,
}

lazy_static! {
    static ref SYSTEM_TABLE: IndexMap<&'static str, SystemSpec> = {
        let mut m = IndexMap::new();
        m.insert("!LOOP", SystemSpec { default: "1", readonly: true, kind: SystemKind::Number });
        m.insert("!DATASOURCE", SystemSpec { default: "", readonly: false, kind: SystemKind::Str });
        m.insert("!DATASOURCE_LINE", SystemSpec { default: "1", readonly: false, kind: SystemKind::Number });
        m.insert("!DATASOURCE_COLUMNS", SystemSpec { default: "0", readonly: true, kind: SystemKind::Number });
        m.insert("!TIMEOUT_STEP", SystemSpec { default: "6", readonly: false, kind: SystemKind::Number });
        m.insert("!TIMEOUT_PAGE", SystemSpec { default: "60", readonly: false, kind: SystemKind::Number });
        m.insert("!TIMEOUT_TAG", SystemSpec { default: "10", readonly: false, kind: SystemKind::Number });
        m.insert("!ERRORIGNORE", SystemSpec { default: "NO", readonly: false, kind: SystemKind::Bool });
        m.insert("!REPLAYSPEED", SystemSpec { default: "MEDIUM", readonly: false, kind: SystemKind::Str });
        m.insert("!FOLDER_DATASOURCE", SystemSpec { default: "", readonly: false, kind: SystemKind::Str });
        m.insert("!FOLDER_DOWNLOAD", SystemSpec { default: "", readonly: false, kind: SystemKind::Str });
        for i in 0..10 {
            m.insert(
                match i {
                    0 => "!VAR0", 1 => "!VAR1", 2 => "!VAR2", 3 => "!VAR3", 4 => "!VAR4",
                    5 => "!VAR5", 6 => "!VAR6", 7 => "!VAR7", 8 => "!VAR8", _ => "!VAR9",
                },
                SystemSpec { default: "", readonly: false, kind: SystemKind::Str },
            );
        }
        m
    };
}

/// Case-insensitively checks whether `name` names a `!COL<n>` readonly
/// datasource column variable (the count is dynamic, driven by the loaded
/// datasource, so it cannot live in the static `SYSTEM_TABLE`).
fn is_col_variable(upper: &str) -> bool {
    upper.strip_prefix("!COL").is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

pub struct VariableStore {
    entries: IndexMap<String, VariableEntry>,
    /// Datasource row columns, exposed read-only as `!COL1..!COLn`.
    columns: Vec<String>,
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableStore {
    pub fn new() -> Self {
        let mut entries = IndexMap::new();
        for (name, spec) in SYSTEM_TABLE.iter() {
            let value = match spec.kind {
                SystemKind::Str => VariableValue::Str(spec.default.to_string()),
                SystemKind::Number => VariableValue::Number(spec.default.parse().unwrap_or(0.0)),
                SystemKind::Bool => VariableValue::Bool(spec.default.eq_ignore_ascii_case("YES")),
            };
            entries.insert((*name).to_string(), VariableEntry { value, readonly: spec.readonly });
        }
        Self { entries, columns: Vec::new() }
    }

    fn canonical(name: &str) -> String {
        name.to_ascii_uppercase()
    }

    /// Reads a variable. `!NOW` is computed at read time; `!COL<n>` reads
    /// from the current datasource row; `!EXTRACT` materialises `extract`'s
    /// `[EXTRACT]`-joined view (absent when the caller has no buffer handy,
    /// in which case it reads as empty rather than panicking).
    pub fn get(&self, name: &str, extract: Option<&ExtractBuffer>) -> Option<VariableValue> {
        let upper = Self::canonical(name);
        if upper == "!NOW" {
            return Some(VariableValue::Str(chrono::Utc::now().to_rfc3339()));
        }
        if upper == "!EXTRACT" {
            return Some(VariableValue::Str(extract.map(|e| e.joined()).unwrap_or_default()));
        }
        if is_col_variable(&upper) {
            let idx: usize = upper[4..].parse().ok()?;
            return self.columns.get(idx.checked_sub(1)?).cloned().map(VariableValue::Str);
        }
        self.entries.get(&upper).map(|e| e.value.clone())
    }

    pub fn exists(&self, name: &str) -> bool {
        let upper = Self::canonical(name);
        upper == "!NOW" || upper == "!EXTRACT" || is_col_variable(&upper) || self.entries.contains_key(&upper)
    }

    fn is_readonly(&self, upper: &str) -> bool {
        upper == "!NOW" || upper == "!EXTRACT" || is_col_variable(upper) || self.entries.get(upper).is_some_and(|e| e.readonly)
    }

    /// Sets a variable from raw textual input (the form every handler
    /// writes with). `!`-prefixed names must already exist in the system
    /// table (or be a dynamic/column name, both readonly); user names are
    /// created with an inferred type on first write.
    pub fn set(&mut self, name: &str, raw_value: &str) -> Result<(), EngineError> {
        let upper = Self::canonical(name);
        if self.is_readonly(&upper) {
            return Err(EngineError::InvalidParameter(format!("{upper} is readonly")));
        }
        if upper.starts_with('!') {
            let spec = SYSTEM_TABLE
                .get(upper.as_str())
                .ok_or_else(|| EngineError::InvalidParameter(format!("unknown system variable {upper}")))?;
            let value = match spec.kind {
                SystemKind::Str => VariableValue::Str(raw_value.to_string()),
                SystemKind::Number => {
                    let n: f64 = raw_value
                        .parse()
                        .map_err(|_| EngineError::InvalidParameter(format!("{upper} requires a numeric value")))?;
                    VariableValue::Number(n)
                }
                SystemKind::Bool => VariableValue::Bool(matches!(
                    raw_value.to_ascii_uppercase().as_str(),
                    "YES" | "TRUE"
                )),
            };
            self.entries.insert(upper, VariableEntry { value, readonly: false });
        } else {
            self.entries.insert(upper, VariableEntry { value: VariableValue::infer(raw_value), readonly: false });
        }
        Ok(())
    }

    /// Sets an already-typed value directly (used by handlers that produce
    /// structured results, e.g. array extraction), bypassing string coercion
    /// but still honouring the readonly/system-table rules.
    pub fn set_typed(&mut self, name: &str, value: VariableValue) -> Result<(), EngineError> {
        let upper = Self::canonical(name);
        if self.is_readonly(&upper) {
            return Err(EngineError::InvalidParameter(format!("{upper} is readonly")));
        }
        if upper.starts_with('!') && !SYSTEM_TABLE.contains_key(upper.as_str()) {
            return Err(EngineError::InvalidParameter(format!("unknown system variable {upper}")));
        }
        self.entries.insert(upper, VariableEntry { value, readonly: false });
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<(), EngineError> {
        let upper = Self::canonical(name);
        if upper.starts_with('!') {
            return Err(EngineError::InvalidParameter(format!("cannot delete system variable {upper}")));
        }
        self.entries.shift_remove(&upper);
        Ok(())
    }

    /// Loads a datasource row into `!COL1..!COLn` and updates
    /// `!DATASOURCE_COLUMNS`.
    pub fn load_datasource_row(&mut self, columns: Vec<String>) {
        if let Some(e) = self.entries.get_mut("!DATASOURCE_COLUMNS") {
            e.value = VariableValue::Number(columns.len() as f64);
        }
        self.columns = columns;
    }

    /// Single-pass, non-recursive `{{name}}` expansion. Missing names are
    /// left literal; the replacement text is never re-scanned. `extract` is
    /// forwarded to `get` so `{{!EXTRACT}}` expands to the buffer's joined
    /// view.
    pub fn expand(&self, text: &str, extract: Option<&ExtractBuffer>) -> String {
        let mut out = String::with_capacity(text.len());
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if i + 1 < bytes.len() && bytes[i] == b'{' && bytes[i + 1] == b'{' {
                if let Some(end) = text[i + 2..].find("}}") {
                    let name = text[i + 2..i + 2 + end].trim();
                    match self.get(name, extract) {
                        Some(v) => out.push_str(&v.stringify()),
                        None => out.push_str(&text[i..i + 2 + end + 2]),
                    }
                    i += 2 + end + 2;
                    continue;
                }
            }
            // Push one char (respecting UTF-8 boundaries).
            let ch = text[i..].chars().next().unwrap();
            out.push(ch);
            i += ch.len_utf8();
        }
        out
    }

    /// Resets user-created variables, preserving system defaults — the
    /// `loadMacro`/`execute` contract.
    pub fn reset_user_vars(&mut self) {
        let system_names: Vec<String> = SYSTEM_TABLE.keys().map(|k| k.to_string()).collect();
        self.entries.retain(|k, _| system_names.contains(k));
        for name in &system_names {
            let spec = &SYSTEM_TABLE[name.as_str()];
            let value = match spec.kind {
                SystemKind::Str => VariableValue::Str(spec.default.to_string()),
                SystemKind::Number => VariableValue::Number(spec.default.parse().unwrap_or(0.0)),
                SystemKind::Bool => VariableValue::Bool(spec.default.eq_ignore_ascii_case("YES")),
            };
            self.entries.insert(name.clone(), VariableEntry { value, readonly: spec.readonly });
        }
        self.columns.clear();
    }

    /// A stable-order snapshot for `ExecutionResult` serialization.
    pub fn snapshot(&self) -> IndexMap<String, String> {
        self.entries.iter().map(|(k, v)| (k.clone(), v.value.stringify())).collect()
    }
}
