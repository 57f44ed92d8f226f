//! Turning collected statements into import/export records.
//!
//! Classification works on the significant tokens of a statement only and is
//! a pure function of them: the same statement always yields the same record.

use super::error::MalformedStatement;
use super::module::{ExportKind, ExportRecord, ImportBindings, ImportRecord, NamedBinding};
use super::segment::CollectedStatement;
use super::token::{Location, Token, TokenType};

fn strip_quotes(lexeme: &str) -> &str {
    let bytes = lexeme.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&open), Some(&close))
            if bytes.len() >= 2 && open == close && matches!(open, b'\'' | b'"' | b'`') =>
        {
            &lexeme[1..lexeme.len() - 1]
        }
        _ => lexeme,
    }
}

fn binding_name(token: &Token) -> String {
    match token.kind {
        TokenType::StringLiteral => strip_quotes(&token.lexeme).to_string(),
        _ => token.lexeme.clone(),
    }
}

pub fn classify_import(stmt: &CollectedStatement) -> Result<ImportRecord, MalformedStatement> {
    let tokens = stmt.significant();
    let head = match tokens.first() {
        Some(first) if first.is_keyword("import") => &tokens[1..],
        _ => &tokens[..],
    };
    let loc = stmt.loc;

    let (bindings, from_at) = match head {
        [star, ..] if star.is_punctuator("*") => namespace_import(head, loc)?,
        [name, next, ..] if name.is_identifier() && next.is_keyword("from") => {
            (ImportBindings::Default(name.lexeme.clone()), 1)
        }
        [name, comma, rest @ ..] if name.is_identifier() && comma.is_punctuator(",") => {
            if rest.first().is_some_and(|t| t.is_punctuator("*")) {
                return Err(MalformedStatement::import(
                    "a default import combined with a namespace import is not supported",
                    loc,
                ));
            }
            let (mut list, end) = named_bindings(rest, loc)?;
            list.insert(0, NamedBinding::new("default", name.lexeme.clone()));
            (ImportBindings::Named(list), end + 2)
        }
        _ => {
            let (list, end) = named_bindings(head, loc)?;
            (ImportBindings::Named(list), end)
        }
    };

    let specifier = specifier_after(head, from_at, loc)?;
    Ok(ImportRecord {
        bindings,
        specifier,
        range: stmt.range.clone(),
        loc,
        code: stmt.text(),
    })
}

fn namespace_import(
    head: &[Token],
    loc: Location,
) -> Result<(ImportBindings, usize), MalformedStatement> {
    match head {
        [_, as_kw, local, ..] if as_kw.is_keyword("as") && local.is_identifier() => {
            Ok((ImportBindings::Namespace(local.lexeme.clone()), 3))
        }
        [_, as_kw, ..] if as_kw.is_keyword("as") => Err(MalformedStatement::import(
            "expected a namespace name after `as`",
            loc,
        )),
        _ => Err(MalformedStatement::import("expected `as` after `*`", loc)),
    }
}

/// Parse `{ a, b as c }` at the start of `tokens`.
///
/// Returns the bindings and the index just past the closing brace.
fn named_bindings(
    tokens: &[Token],
    loc: Location,
) -> Result<(Vec<NamedBinding>, usize), MalformedStatement> {
    if !tokens.first().is_some_and(|t| t.is_punctuator("{")) {
        return Err(MalformedStatement::import(
            "expected `{`, `*` or a binding name after `import`",
            loc,
        ));
    }

    let mut bindings = Vec::new();
    let mut group: Vec<&Token> = Vec::new();
    let mut depth = 1usize;

    for (i, token) in tokens.iter().enumerate().skip(1) {
        if token.is_keyword("from") && depth > 0 {
            break;
        }
        if token.is_punctuator("{") {
            depth += 1;
        } else if token.is_punctuator("}") {
            depth -= 1;
            if depth == 0 {
                push_group(&mut bindings, &group, loc)?;
                return Ok((bindings, i + 1));
            }
        } else if token.is_punctuator(",") && depth == 1 {
            push_group(&mut bindings, &group, loc)?;
            group.clear();
        } else {
            group.push(token);
        }
    }

    Err(MalformedStatement::import(
        "unbalanced braces in named import",
        loc,
    ))
}

fn push_group(
    bindings: &mut Vec<NamedBinding>,
    group: &[&Token],
    loc: Location,
) -> Result<(), MalformedStatement> {
    match group {
        [] => Ok(()),
        [name] => {
            let name = binding_name(name);
            bindings.push(NamedBinding::new(name.clone(), name));
            Ok(())
        }
        [name, as_kw, alias] if as_kw.is_keyword("as") => {
            bindings.push(NamedBinding::new(binding_name(name), alias.lexeme.clone()));
            Ok(())
        }
        _ => {
            let text = group
                .iter()
                .map(|t| t.lexeme.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            Err(MalformedStatement::import(
                format!("invalid import specifier `{}`", text),
                loc,
            ))
        }
    }
}

fn specifier_after(
    head: &[Token],
    from_at: usize,
    loc: Location,
) -> Result<String, MalformedStatement> {
    if !head.get(from_at).is_some_and(|t| t.is_keyword("from")) {
        return Err(MalformedStatement::import("expected `from`", loc));
    }
    match head.get(from_at + 1) {
        Some(token) if token.kind == TokenType::StringLiteral => {
            Ok(strip_quotes(&token.lexeme).to_string())
        }
        _ => Err(MalformedStatement::import(
            "expected a string specifier after `from`",
            loc,
        )),
    }
}

pub fn classify_export(stmt: &CollectedStatement) -> Result<ExportRecord, MalformedStatement> {
    let tokens = stmt.significant();
    let rest = match tokens.first() {
        Some(first) if first.is_keyword("export") => &tokens[1..],
        _ => &tokens[..],
    };
    let loc = stmt.loc;

    let Some(first) = rest.first().filter(|t| !t.is_punctuator(";")) else {
        return Err(MalformedStatement::export(
            "expected a declaration after `export`",
            loc,
        ));
    };

    let kind = if first.is_keyword("default") {
        ExportKind::Default
    } else if stmt.has_from() {
        ExportKind::ReExport
    } else {
        ExportKind::Named
    };

    let exported = rest
        .iter()
        .find(|t| t.is_identifier() || t.is_keyword("default"))
        .map(|t| t.lexeme.clone())
        .or_else(|| {
            (kind == ExportKind::ReExport && first.is_punctuator("*")).then(|| "*".to_string())
        })
        .ok_or_else(|| MalformedStatement::export("expected an exported name", loc))?;

    Ok(ExportRecord {
        kind,
        declaration: first.lexeme.clone(),
        exported,
        range: stmt.range.clone(),
        loc,
        code: stmt.text(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StatementKind;
    use crate::core::lexer::{Language, Lexer};
    use crate::core::segment::StatementSegmenter;
    use crate::core::token::TokenSource;
    use pretty_assertions::assert_eq;

    fn collect(src: &str) -> CollectedStatement {
        let mut lexer = Lexer::new(src, Language::Ecma);
        let mut segmenter = StatementSegmenter::new();
        while let Some(token) = lexer.next_token() {
            if let Some(stmt) = segmenter.feed(&token.unwrap()) {
                return stmt;
            }
        }
        panic!("no statement in {:?}", src);
    }

    fn import(src: &str) -> ImportRecord {
        classify_import(&collect(src)).unwrap()
    }

    fn import_error(src: &str) -> MalformedStatement {
        classify_import(&collect(src)).unwrap_err()
    }

    fn export(src: &str) -> ExportRecord {
        classify_export(&collect(src)).unwrap()
    }

    #[test]
    fn test_named_import() {
        let record = import("import { a, b as c } from './x.js';");
        assert_eq!(record.specifier, "./x.js");
        assert_eq!(
            record.bindings,
            ImportBindings::Named(vec![NamedBinding::new("a", "a"), NamedBinding::new("b", "c")])
        );
        assert_eq!(record.range, 0..35);
        assert_eq!(record.code, "import { a, b as c } from './x.js';");
    }

    #[test]
    fn test_namespace_import() {
        let record = import("import * as ns from './y.js';");
        assert_eq!(record.specifier, "./y.js");
        assert_eq!(record.bindings, ImportBindings::Namespace("ns".to_string()));
    }

    #[test]
    fn test_default_import() {
        let record = import("import Def from \"./z.js\"\n");
        assert_eq!(record.specifier, "./z.js");
        assert_eq!(record.bindings, ImportBindings::Default("Def".to_string()));
    }

    #[test]
    fn test_default_and_named_import() {
        let record = import("import React, { useState as useS } from 'react';");
        assert_eq!(
            record.bindings,
            ImportBindings::Named(vec![
                NamedBinding::new("default", "React"),
                NamedBinding::new("useState", "useS"),
            ])
        );
        assert_eq!(record.specifier, "react");
    }

    #[test]
    fn test_named_import_trailing_comma_and_string_name() {
        let record = import("import { 'a-b' as ab, c, } from './m.js';");
        assert_eq!(
            record.bindings,
            ImportBindings::Named(vec![NamedBinding::new("a-b", "ab"), NamedBinding::new("c", "c")])
        );
    }

    #[test]
    fn test_comments_are_ignored() {
        let record = import("import /* all */ * as ns /* here */ from './y.js';");
        assert_eq!(record.bindings, ImportBindings::Namespace("ns".to_string()));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let stmt = collect("import { a, b as c } from './x.js';");
        let first = classify_import(&stmt).unwrap();
        let second = classify_import(&stmt).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_from_is_malformed() {
        let err = import_error("import * as ns './y.js';");
        assert_eq!(err.kind, StatementKind::Import);
        assert_eq!(err.reason, "expected `from`");

        let err = import_error("import { a } './y.js';");
        assert_eq!(err.reason, "expected `from`");
    }

    #[test]
    fn test_namespace_without_as_is_malformed() {
        let err = import_error("import * from './y.js';");
        assert_eq!(err.reason, "expected `as` after `*`");
    }

    #[test]
    fn test_unbalanced_named_import_is_malformed() {
        let err = import_error("import { a, b from './y.js';");
        assert_eq!(err.reason, "unbalanced braces in named import");

        let err = import_error("import { a, { b } from './y.js';");
        assert_eq!(err.reason, "unbalanced braces in named import");
    }

    #[test]
    fn test_non_string_specifier_is_malformed() {
        let err = import_error("import x from y;");
        assert_eq!(err.reason, "expected a string specifier after `from`");
    }

    #[test]
    fn test_invalid_group_is_malformed() {
        let err = import_error("import { a b } from './y.js';");
        assert_eq!(err.reason, "invalid import specifier `a b`");
    }

    #[test]
    fn test_export_declarations() {
        let record = export("export const answer = 42;");
        assert_eq!(record.kind, ExportKind::Named);
        assert_eq!(record.declaration, "const");
        assert_eq!(record.exported, "answer");

        let record = export("export async function load() {\n");
        assert_eq!(record.exported, "load");
        assert_eq!(record.code, "export async function load() {\n");
    }

    #[test]
    fn test_export_default() {
        let record = export("export default class Foo {}\n");
        assert_eq!(record.kind, ExportKind::Default);
        assert_eq!(record.declaration, "default");
        assert_eq!(record.exported, "default");
    }

    #[test]
    fn test_re_exports() {
        let record = export("export { a as b } from './a.js';");
        assert_eq!(record.kind, ExportKind::ReExport);
        assert_eq!(record.declaration, "{");
        assert_eq!(record.exported, "a");

        let record = export("export * from './all.js';");
        assert_eq!(record.kind, ExportKind::ReExport);
        assert_eq!(record.exported, "*");
    }

    #[test]
    fn test_empty_export_is_malformed() {
        let err = classify_export(&collect("export;")).unwrap_err();
        assert_eq!(err.kind, StatementKind::Export);
    }
}
