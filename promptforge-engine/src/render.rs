// Copyright 2026 PromptForge Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The Template Renderer: variable validation followed by a small, sandboxed
//! expansion language (`{{ var }}`, `{% if %}`/`{% else %}`, `{% for %}`).
//! There is no file access, no arbitrary expression evaluation, and no
//! auto-escaping — callers own what they put into a prompt's output.

use std::collections::BTreeMap;

use promptforge_core::{TemplateError, Value, VarMap, VariableDef};

/// Merges declared defaults under `provided`, then checks every required
/// variable is present and every enum-constrained variable holds an
/// allowed value. This is always the first step of a render; it never
/// touches the template text.
pub fn validate_variables(
    defs: &[VariableDef],
    provided: &VarMap,
) -> Result<VarMap, TemplateError> {
    let mut context = VarMap::new();
    for def in defs {
        if let Some(default) = &def.default {
            context.insert(def.name.clone(), default.clone());
        }
    }
    for (key, value) in provided {
        context.insert(key.clone(), value.clone());
    }

    let missing: Vec<String> = defs
        .iter()
        .filter(|def| def.required && !context.contains_key(&def.name))
        .map(|def| def.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(TemplateError::VariablesMissing(missing));
    }

    for def in defs {
        let Some(value) = context.get(&def.name) else {
            continue;
        };
        check_type(def, value)?;
        if let Some(allowed) = &def.enum_values {
            let canonical = value.canonical_string();
            if !allowed.iter().any(|a| a == &canonical) {
                return Err(TemplateError::VariableInvalid {
                    name: def.name.clone(),
                    detail: format!("'{canonical}' is not one of {allowed:?}"),
                });
            }
        }
    }

    Ok(context)
}

fn check_type(def: &VariableDef, value: &Value) -> Result<(), TemplateError> {
    let ok = match def.r#type.as_str() {
        "number" => matches!(value, Value::Number(_)),
        "boolean" => matches!(value, Value::Bool(_)),
        "array" => matches!(value, Value::Seq(_)),
        "object" => matches!(value, Value::Map(_)),
        _ => true, // "string" and any unrecognized type are accepted as-is
    };
    if ok {
        Ok(())
    } else {
        Err(TemplateError::VariableInvalid {
            name: def.name.clone(),
            detail: format!("expected type '{}', got {:?}", def.r#type, value),
        })
    }
}

/// Renders `template` against an already-validated `context`.
pub fn render(template: &str, context: &VarMap) -> Result<String, TemplateError> {
    let tokens = tokenize(template)?;
    let (body, rest) = parse_block(&tokens, 0)?;
    if rest != tokens.len() {
        return Err(TemplateError::Syntax("unexpected trailing block tag".to_string()));
    }
    let root = Value::Map(context.iter().map(|(k, v)| (k.clone(), v.clone())).collect());
    let mut out = String::new();
    render_nodes(&body, &root, &mut out)?;
    Ok(out)
}

#[derive(Debug, Clone)]
enum Token {
    Text(String),
    Expr(String),
    Stmt(String),
}

fn tokenize(template: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut rest = template;
    loop {
        match (rest.find("{{"), rest.find("{%")) {
            (None, None) => {
                if !rest.is_empty() {
                    tokens.push(Token::Text(rest.to_string()));
                }
                break;
            }
            (open_expr, open_stmt) => {
                let is_expr = match (open_expr, open_stmt) {
                    (Some(e), Some(s)) => e < s,
                    (Some(_), None) => true,
                    (None, Some(_)) => false,
                    (None, None) => unreachable!(),
                };
                let start = if is_expr { open_expr.unwrap() } else { open_stmt.unwrap() };
                if start > 0 {
                    tokens.push(Token::Text(rest[..start].to_string()));
                }
                let (close_delim, tag_len) = if is_expr { ("}}", 2) } else { ("%}", 2) };
                let after_open = &rest[start + tag_len..];
                let close = after_open.find(close_delim).ok_or_else(|| {
                    TemplateError::Syntax(format!(
                        "unterminated '{}' tag",
                        if is_expr { "{{" } else { "{%" }
                    ))
                })?;
                let inner = after_open[..close].trim().to_string();
                if is_expr {
                    tokens.push(Token::Expr(inner));
                } else {
                    tokens.push(Token::Stmt(inner));
                }
                rest = &after_open[close + tag_len..];
            }
        }
    }
    Ok(tokens)
}

#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Var(String),
    If {
        cond: Cond,
        then_body: Vec<Node>,
        else_body: Vec<Node>,
    },
    For {
        binding: String,
        iterable: String,
        body: Vec<Node>,
    },
}

#[derive(Debug, Clone)]
enum Cond {
    Truthy(String),
    Not(String),
    Eq(String, String),
    Ne(String, String),
}

/// Parses tokens starting at `start` until a block-ending tag (`endif`,
/// `else`, `endfor`) or end of input; returns the parsed nodes and the
/// index of the terminating tag (or `tokens.len()` at EOF).
fn parse_block(tokens: &[Token], start: usize) -> Result<(Vec<Node>, usize), TemplateError> {
    let mut nodes = Vec::new();
    let mut i = start;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Text(text) => {
                nodes.push(Node::Text(text.clone()));
                i += 1;
            }
            Token::Expr(path) => {
                nodes.push(Node::Var(path.clone()));
                i += 1;
            }
            Token::Stmt(stmt) => {
                let head = stmt.split_whitespace().next().unwrap_or("");
                match head {
                    "endif" | "else" | "endfor" => return Ok((nodes, i)),
                    "if" => {
                        let cond = parse_cond(stmt)?;
                        let (then_body, next) = parse_block(tokens, i + 1)?;
                        let (else_body, after) = match tokens.get(next) {
                            Some(Token::Stmt(s)) if s.trim() == "else" => parse_block(tokens, next + 1)?,
                            _ => (Vec::new(), next),
                        };
                        match tokens.get(after) {
                            Some(Token::Stmt(s)) if s.trim() == "endif" => {}
                            _ => return Err(TemplateError::Syntax("missing 'endif'".to_string())),
                        }
                        nodes.push(Node::If { cond, then_body, else_body });
                        i = after + 1;
                    }
                    "for" => {
                        let (binding, iterable) = parse_for(stmt)?;
                        let (body, next) = parse_block(tokens, i + 1)?;
                        match tokens.get(next) {
                            Some(Token::Stmt(s)) if s.trim() == "endfor" => {}
                            _ => return Err(TemplateError::Syntax("missing 'endfor'".to_string())),
                        }
                        nodes.push(Node::For { binding, iterable, body });
                        i = next + 1;
                    }
                    other => {
                        return Err(TemplateError::Syntax(format!("unknown tag '{other}'")));
                    }
                }
            }
        }
    }
    Ok((nodes, i))
}

fn parse_cond(stmt: &str) -> Result<Cond, TemplateError> {
    let body = stmt.strip_prefix("if").unwrap_or(stmt).trim();
    if let Some(rest) = body.strip_prefix("not ") {
        return Ok(Cond::Not(rest.trim().to_string()));
    }
    if let Some((lhs, rhs)) = body.split_once("==") {
        return Ok(Cond::Eq(lhs.trim().to_string(), unquote(rhs.trim())));
    }
    if let Some((lhs, rhs)) = body.split_once("!=") {
        return Ok(Cond::Ne(lhs.trim().to_string(), unquote(rhs.trim())));
    }
    if body.is_empty() {
        return Err(TemplateError::Syntax("empty 'if' condition".to_string()));
    }
    Ok(Cond::Truthy(body.to_string()))
}

fn parse_for(stmt: &str) -> Result<(String, String), TemplateError> {
    let body = stmt.strip_prefix("for").unwrap_or(stmt).trim();
    let (binding, iterable) = body
        .split_once(" in ")
        .ok_or_else(|| TemplateError::Syntax("expected 'for x in y'".to_string()))?;
    Ok((binding.trim().to_string(), iterable.trim().to_string()))
}

fn unquote(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

fn render_nodes(nodes: &[Node], ctx: &Value, out: &mut String) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(path) => {
                let value = ctx
                    .get_path(path)
                    .ok_or_else(|| TemplateError::Undefined(path.clone()))?;
                out.push_str(&value.canonical_string());
            }
            Node::If { cond, then_body, else_body } => {
                if eval_cond(cond, ctx)? {
                    render_nodes(then_body, ctx, out)?;
                } else {
                    render_nodes(else_body, ctx, out)?;
                }
            }
            Node::For { binding, iterable, body } => {
                let seq = ctx
                    .get_path(iterable)
                    .ok_or_else(|| TemplateError::Undefined(iterable.clone()))?
                    .as_sequence()
                    .ok_or_else(|| {
                        TemplateError::VariableInvalid {
                            name: iterable.clone(),
                            detail: "'for' target is not a list".to_string(),
                        }
                    })?
                    .to_vec();
                for item in seq {
                    let mut scoped: BTreeMap<String, Value> = match ctx {
                        Value::Map(entries) => entries.clone(),
                        _ => BTreeMap::new(),
                    };
                    scoped.insert(binding.clone(), item);
                    render_nodes(body, &Value::Map(scoped), out)?;
                }
            }
        }
    }
    Ok(())
}

fn eval_cond(cond: &Cond, ctx: &Value) -> Result<bool, TemplateError> {
    Ok(match cond {
        Cond::Truthy(path) => ctx.get_path(path).map(Value::truthy).unwrap_or(false),
        Cond::Not(path) => !ctx.get_path(path).map(Value::truthy).unwrap_or(false),
        Cond::Eq(path, literal) => ctx
            .get_path(path)
            .map(|v| &v.canonical_string() == literal)
            .unwrap_or(false),
        Cond::Ne(path, literal) => ctx
            .get_path(path)
            .map(|v| &v.canonical_string() != literal)
            .unwrap_or(true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, Value)]) -> VarMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn validate_fills_defaults_and_catches_missing_required() {
        let defs = vec![
            VariableDef::new("name"),
            VariableDef::new("tone").optional(Value::from("formal")),
        ];
        let err = validate_variables(&defs, &VarMap::new()).unwrap_err();
        assert_eq!(err, TemplateError::VariablesMissing(vec!["name".to_string()]));

        let ctx = validate_variables(&defs, &vars(&[("name", Value::from("Ada"))])).unwrap();
        assert_eq!(ctx.get("tone").unwrap().as_str(), Some("formal"));
    }

    #[test]
    fn validate_rejects_value_outside_enum() {
        let defs = vec![VariableDef::new("tone").with_enum(vec!["formal".into(), "casual".into()])];
        let err = validate_variables(&defs, &vars(&[("tone", Value::from("sarcastic"))])).unwrap_err();
        assert!(matches!(err, TemplateError::VariableInvalid { .. }));
    }

    #[test]
    fn render_substitutes_simple_variables() {
        let ctx = vars(&[("name", Value::from("Ada"))]);
        let out = render("Hello, {{ name }}!", &ctx).unwrap();
        assert_eq!(out, "Hello, Ada!");
    }

    #[test]
    fn render_resolves_dotted_paths() {
        let mut user = BTreeMap::new();
        user.insert("name".to_string(), Value::from("Ada"));
        let ctx = vars(&[("user", Value::Map(user))]);
        assert_eq!(render("Hi {{ user.name }}", &ctx).unwrap(), "Hi Ada");
    }

    #[test]
    fn render_evaluates_if_else() {
        let ctx = vars(&[("premium", Value::Bool(false))]);
        let out = render("{% if premium %}VIP{% else %}standard{% endif %}", &ctx).unwrap();
        assert_eq!(out, "standard");
    }

    #[test]
    fn render_expands_for_loop() {
        let ctx = vars(&[(
            "items",
            Value::Seq(vec![Value::from("a"), Value::from("b"), Value::from("c")]),
        )]);
        let out = render("{% for x in items %}[{{ x }}]{% endfor %}", &ctx).unwrap();
        assert_eq!(out, "[a][b][c]");
    }

    #[test]
    fn render_fails_on_undefined_variable() {
        let ctx = VarMap::new();
        let err = render("{{ missing }}", &ctx).unwrap_err();
        assert_eq!(err, TemplateError::Undefined("missing".to_string()));
    }

    #[test]
    fn render_fails_on_unterminated_tag() {
        let ctx = VarMap::new();
        let err = render("{{ name", &ctx).unwrap_err();
        assert!(matches!(err, TemplateError::Syntax(_)));
    }
}
