//! Go source parser.
use crate::debugger::source::ast::{
    Block, CallExpr, CaseClause, Decl, Expr, ExprKind, File, FuncDecl, Ident, Stmt, TypeLit,
    ValueSpec,
};
use chumsky::prelude::*;
use chumsky::span::{SimpleSpan, Span as _};
use chumsky::Boxed;
use std::ops::Range;

type Err<'a> = extra::Err<Rich<'a, char>>;
type BoxedParser<'a, O> = Boxed<'a, 'a, &'a str, O, Err<'a>>;

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

fn range(span: SimpleSpan) -> Range<usize> {
    span.start()..span.end()
}

/// Keywords that end a statement when they are the last token of a line.
const TERMINATING_KEYWORDS: &[&str] = &["break", "continue", "fallthrough", "return"];

/// Turn line ends that terminate a statement into `;` and blank out comments.
///
/// A line end terminates a statement if the last token of the line is an identifier,
/// a literal, a closing bracket, `++`, `--` or one of [`TERMINATING_KEYWORDS`]. A general
/// comment that spans lines counts as a line end. Byte offsets of the text are preserved.
fn insert_semicolons(text: &str) -> String {
    fn blank(out: &mut String, c: char) {
        out.extend(std::iter::repeat(' ').take(c.len_utf8()));
    }
    fn line_end(out: &mut String, terminates: &mut bool) {
        out.push(if *terminates { ';' } else { '\n' });
        *terminates = false;
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut terminates = false;

    while let Some(c) = chars.next() {
        match c {
            '\n' => line_end(&mut out, &mut terminates),
            '/' if chars.peek() == Some(&'/') => {
                out.push(' ');
                while let Some(c) = chars.next_if(|c| *c != '\n') {
                    blank(&mut out, c);
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str("  ");
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if c == '\n' {
                        line_end(&mut out, &mut terminates);
                    } else {
                        blank(&mut out, c);
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            '"' | '\'' => {
                out.push(c);
                while let Some(ch) = chars.next() {
                    out.push(ch);
                    if ch == '\\' {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    } else if ch == c || ch == '\n' {
                        break;
                    }
                }
                terminates = true;
            }
            '`' => {
                out.push(c);
                for ch in chars.by_ref() {
                    out.push(ch);
                    if ch == '`' {
                        break;
                    }
                }
                terminates = true;
            }
            ')' | ']' | '}' => {
                out.push(c);
                terminates = true;
            }
            '+' | '-' if chars.peek() == Some(&c) => {
                chars.next();
                out.push(c);
                out.push(c);
                terminates = true;
            }
            c if c.is_alphanumeric() || c == '_' => {
                let number = c.is_ascii_digit();
                let mut word = String::from(c);
                while let Some(ch) = chars
                    .next_if(|ch| ch.is_alphanumeric() || *ch == '_' || (number && *ch == '.'))
                {
                    word.push(ch);
                }
                out.push_str(&word);
                terminates = number
                    || !KEYWORDS.contains(&word.as_str())
                    || TERMINATING_KEYWORDS.contains(&word.as_str());
            }
            c if c.is_whitespace() => out.push(c),
            c => {
                out.push(c);
                terminates = false;
            }
        }
    }
    out
}

/// Whitespaces (newlines included).
fn trivia<'a>() -> impl Parser<'a, &'a str, (), Err<'a>> + Clone {
    any()
        .filter(|c: &char| c.is_whitespace())
        .ignored()
        .repeated()
}

/// Token followed by trivia, yields token span.
fn tok<'a>(s: &'static str) -> impl Parser<'a, &'a str, Range<usize>, Err<'a>> + Clone {
    just(s)
        .map_with(|_, e| range(e.span()))
        .then_ignore(trivia())
}

/// Operator token that must not be immediately followed by any char from `deny`
/// (`<` is not a prefix of `<-`, `=` is not a prefix of `==`, etc).
fn op<'a>(
    s: &'static str,
    deny: &'static str,
) -> impl Parser<'a, &'a str, &'static str, Err<'a>> + Clone {
    just(s)
        .then_ignore(one_of(deny).not())
        .to(s)
        .then_ignore(trivia())
}

fn kw<'a>(word: &'static str) -> impl Parser<'a, &'a str, Range<usize>, Err<'a>> + Clone {
    text::ascii::ident()
        .filter(move |s: &&str| *s == word)
        .map_with(|_, e| range(e.span()))
        .then_ignore(trivia())
        .labelled(word)
}

fn ident<'a>() -> impl Parser<'a, &'a str, Ident, Err<'a>> + Clone {
    text::ascii::ident()
        .filter(|s: &&str| !KEYWORDS.contains(s))
        .map_with(|name: &str, e| Ident {
            name: name.to_string(),
            span: range(e.span()),
        })
        .then_ignore(trivia())
        .labelled("identifier")
}

fn string_lit<'a>() -> impl Parser<'a, &'a str, &'a str, Err<'a>> + Clone {
    let escape = just('\\').then(any()).ignored();
    let interpreted = just('"')
        .then(choice((escape, none_of("\\\"\n").ignored())).repeated())
        .then(just('"'))
        .ignored();
    let raw = just('`')
        .then(none_of("`").repeated())
        .then(just('`'))
        .ignored();
    choice((interpreted, raw)).to_slice().labelled("string")
}

fn rune_lit<'a>() -> impl Parser<'a, &'a str, &'a str, Err<'a>> + Clone {
    let escape = just('\\').then(any()).ignored();
    just('\'')
        .then(choice((escape, none_of("\\'\n").ignored())).repeated())
        .then(just('\''))
        .to_slice()
        .labelled("rune")
}

fn number_lit<'a>() -> impl Parser<'a, &'a str, &'a str, Err<'a>> + Clone {
    let digit = any().filter(|c: &char| c.is_ascii_digit());
    let exponent = one_of("eEpP").then(one_of("+-")).ignored();
    let rest = choice((
        exponent,
        any()
            .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
            .ignored(),
    ))
    .repeated();
    choice((digit.clone().ignored(), just('.').then(digit).ignored()))
        .then(rest)
        .to_slice()
        .labelled("number")
}

/// Any text with balanced brackets, skipped without building a tree.
fn balanced<'a>() -> impl Parser<'a, &'a str, (), Err<'a>> + Clone {
    recursive(|inner| {
        let group = |open: char, close: char| {
            just(open)
                .then(inner.clone())
                .then(just(close))
                .ignored()
        };
        choice((
            group('(', ')'),
            group('[', ']'),
            group('{', '}'),
            string_lit().ignored(),
            any()
                .filter(|c: &char| !"()[]{}\"`".contains(*c))
                .ignored(),
        ))
        .repeated()
    })
}

fn delimited_group<'a>(
    open: char,
    close: char,
) -> impl Parser<'a, &'a str, Range<usize>, Err<'a>> + Clone {
    just(open)
        .then(balanced())
        .then(just(close))
        .map_with(|_, e| range(e.span()))
        .then_ignore(trivia())
}

/// Function parameters and optional results, yields end offset.
fn signature<'a, T>(ty: T) -> impl Parser<'a, &'a str, usize, Err<'a>> + Clone
where
    T: Parser<'a, &'a str, usize, Err<'a>> + Clone,
{
    delimited_group('(', ')')
        .then(
            choice((delimited_group('(', ')').map(|results| results.end), ty)).or_not(),
        )
        .map(|(params, results)| results.unwrap_or(params.end))
}

/// Type expression, skipped, yields end offset.
fn type_expr<'a>() -> impl Parser<'a, &'a str, usize, Err<'a>> + Clone {
    recursive(|ty| {
        let named = ident()
            .foldl(tok(".").ignore_then(ident()).repeated(), |_, sel| sel)
            .then(delimited_group('[', ']').or_not())
            .map(|(name, args)| args.map_or(name.span.end, |args| args.end));

        choice((
            delimited_group('[', ']').ignore_then(ty.clone()),
            kw("map")
                .ignore_then(delimited_group('[', ']'))
                .ignore_then(ty.clone()),
            kw("chan")
                .ignore_then(op("<-", "").or_not())
                .ignore_then(ty.clone()),
            tok("<-").ignore_then(kw("chan")).ignore_then(ty.clone()),
            kw("func").ignore_then(signature(ty.clone())),
            kw("struct")
                .ignore_then(delimited_group('{', '}'))
                .map(|body| body.end),
            kw("interface")
                .ignore_then(delimited_group('{', '}'))
                .map(|body| body.end),
            tok("*").ignore_then(ty.clone()),
            tok("(")
                .ignore_then(ty.clone())
                .then(tok(")"))
                .map(|(_, close)| close.end),
            named,
        ))
    })
}

enum Postfix {
    Selector(Ident),
    TypeAssert(Option<Expr>, usize),
    Index(Vec<Expr>, usize),
    Slice(Vec<Option<Expr>>, usize),
    Call(Vec<Expr>, bool, usize),
    Composite(Vec<Expr>, usize),
}

/// Tail of `[` postfix after the first expression.
enum Bracket {
    Slice(Vec<Option<Expr>>),
    Index(Vec<Expr>),
}

fn apply_postfix(lhs: Expr, postfix: Postfix) -> Expr {
    let start = lhs.span.start;
    let lhs = Box::new(lhs);
    match postfix {
        Postfix::Selector(sel) => {
            let end = sel.span.end;
            Expr::new(ExprKind::Selector(lhs, sel), start..end)
        }
        Postfix::TypeAssert(ty, end) => {
            Expr::new(ExprKind::TypeAssert(lhs, ty.map(Box::new)), start..end)
        }
        Postfix::Index(items, end) => Expr::new(ExprKind::Index(lhs, items), start..end),
        Postfix::Slice(parts, end) => Expr::new(ExprKind::Slice(lhs, parts), start..end),
        Postfix::Call(args, ellipsis, end) => Expr::new(
            ExprKind::Call(CallExpr {
                fun: lhs,
                args,
                ellipsis,
                span: start..end,
            }),
            start..end,
        ),
        Postfix::Composite(elems, end) => Expr::new(
            ExprKind::Composite {
                ty: Some(lhs),
                elems,
            },
            start..end,
        ),
    }
}

/// Body of composite literal `{a, k: v, {nested}}`, yields elements and end offset.
fn composite_body<'a>(inner: BoxedParser<'a, Expr>) -> BoxedParser<'a, (Vec<Expr>, usize)> {
    recursive(|body| {
        let value = choice((
            body.clone()
                .map_with(|(elems, end): (Vec<Expr>, usize), e| {
                    let start = range(e.span()).start;
                    Expr::new(ExprKind::Composite { ty: None, elems }, start..end)
                }),
            inner.clone(),
        ));
        let element = value
            .clone()
            .then(tok(":").ignore_then(value).or_not())
            .map(|(key, value)| match value {
                Some(value) => Expr::key_value(key, value),
                None => key,
            });

        tok("{")
            .ignore_then(
                element
                    .separated_by(tok(","))
                    .allow_trailing()
                    .collect::<Vec<_>>(),
            )
            .then(tok("}"))
            .map(|(elems, close)| (elems, close.end))
    })
    .boxed()
}

fn binary<'a>(
    operand: BoxedParser<'a, Expr>,
    ops: BoxedParser<'a, &'static str>,
) -> BoxedParser<'a, Expr> {
    operand
        .clone()
        .foldl(ops.then(operand).repeated(), |lhs, (op, rhs)| {
            Expr::binary(op, lhs, rhs)
        })
        .boxed()
}

/// Expression parser over `inner` (used for nested expressions inside brackets).
/// When `composite` is false a composite literal is not allowed after a type name, this
/// resolves `if x == T {` style ambiguity in statement headers.
fn operators<'a>(
    inner: BoxedParser<'a, Expr>,
    block: BoxedParser<'a, Block>,
    composite: bool,
) -> BoxedParser<'a, Expr> {
    let composite_body = composite_body(inner.clone());

    let literal = choice((string_lit(), rune_lit(), number_lit()))
        .map_with(|text: &str, e| Expr::new(ExprKind::Lit(text.to_string()), range(e.span())))
        .then_ignore(trivia());

    let func = kw("func")
        .then(signature(type_expr()))
        .to_slice()
        .then(block.or_not())
        .map_with(|(head, body): (&str, Option<Block>), e| {
            let start = range(e.span()).start;
            match body {
                Some(body) => {
                    let end = body.span.end;
                    Expr::new(ExprKind::FuncLit(body), start..end)
                }
                None => {
                    let head = head.trim_end();
                    Expr::new(
                        ExprKind::Type {
                            kind: TypeLit::Func,
                            text: head.to_string(),
                        },
                        start..start + head.len(),
                    )
                }
            }
        });

    let type_lit = choice((
        delimited_group('[', ']')
            .ignore_then(type_expr())
            .ignored(),
        kw("map")
            .ignore_then(delimited_group('[', ']'))
            .ignore_then(type_expr())
            .ignored(),
        kw("chan")
            .ignore_then(op("<-", "").or_not())
            .ignore_then(type_expr())
            .ignored(),
        kw("struct")
            .ignore_then(delimited_group('{', '}'))
            .ignored(),
        kw("interface")
            .ignore_then(delimited_group('{', '}'))
            .ignored(),
    ))
    .to_slice()
    .map_with(|text: &str, e| {
        let text = text.trim_end();
        let start = range(e.span()).start;
        Expr::new(
            ExprKind::Type {
                kind: TypeLit::of(text),
                text: text.to_string(),
            },
            start..start + text.len(),
        )
    })
    .then(composite_body.clone().or_not())
    .map(|(ty, body)| match body {
        Some((elems, end)) => apply_postfix(ty, Postfix::Composite(elems, end)),
        None => ty,
    });

    let paren = tok("(")
        .then(inner.clone())
        .then(tok(")"))
        .map(|((open, x), close)| Expr::new(ExprKind::Paren(Box::new(x)), open.start..close.end));

    let name = ident().map(|id| Expr::new(ExprKind::Ident(id.name), id.span));

    let operand = choice((literal, func, type_lit, paren, name));

    let selector = tok(".").ignore_then(ident()).map(Postfix::Selector);
    let assert = tok(".")
        .ignore_then(tok("("))
        .ignore_then(choice((kw("type").to(None), inner.clone().map(Some))))
        .then(tok(")"))
        .map(|(ty, close)| Postfix::TypeAssert(ty, close.end));
    let bracket = tok("[")
        .ignore_then(inner.clone().or_not())
        .then(choice((
            tok(":")
                .ignore_then(inner.clone().or_not())
                .repeated()
                .at_least(1)
                .at_most(2)
                .collect::<Vec<_>>()
                .map(Bracket::Slice),
            tok(",")
                .ignore_then(inner.clone())
                .repeated()
                .collect::<Vec<_>>()
                .then_ignore(tok(",").or_not())
                .map(Bracket::Index),
        )))
        .then(tok("]"))
        .try_map(
            |((first, rest), close): ((Option<Expr>, Bracket), Range<usize>), span| {
                match (rest, first) {
                    (Bracket::Slice(rest), first) => Ok(Postfix::Slice(
                        std::iter::once(first).chain(rest).collect(),
                        close.end,
                    )),
                    (Bracket::Index(rest), Some(first)) => Ok(Postfix::Index(
                        std::iter::once(first).chain(rest).collect(),
                        close.end,
                    )),
                    (Bracket::Index(_), None) => {
                        Err(Rich::custom(span, "expected index expression"))
                    }
                }
            },
        );
    let call = tok("(")
        .ignore_then(
            inner
                .clone()
                .separated_by(tok(","))
                .allow_trailing()
                .collect::<Vec<_>>(),
        )
        .then(tok("...").or_not())
        .then_ignore(tok(",").or_not())
        .then(tok(")"))
        .map(|((args, dots), close)| Postfix::Call(args, dots.is_some(), close.end));

    let postfix = if composite {
        choice((
            assert,
            selector,
            bracket,
            call,
            composite_body.map(|(elems, end)| Postfix::Composite(elems, end)),
        ))
        .boxed()
    } else {
        choice((assert, selector, bracket, call)).boxed()
    };

    let primary = operand.foldl(postfix.repeated(), apply_postfix);

    let unary_op = choice((
        op("<-", ""),
        op("!", "="),
        op("^", "="),
        op("*", "="),
        op("&", "&^="),
        op("+", "+="),
        op("-", "-="),
    ))
    .map_with(|sym, e| (sym, range(e.span()).start));
    let unary = unary_op
        .repeated()
        .foldr(primary, |(sym, start), operand| {
            Expr::unary(sym, start, operand)
        })
        .boxed();

    let product = binary(
        unary,
        choice((
            op("*", "="),
            op("/", "="),
            op("%", "="),
            op("<<", "="),
            op(">>", "="),
            op("&^", "="),
            op("&", "&^="),
        ))
        .boxed(),
    );
    let sum = binary(
        product,
        choice((op("+", "+="), op("-", "-="), op("|", "|="), op("^", "="))).boxed(),
    );
    let comparison = binary(
        sum,
        choice((
            op("==", ""),
            op("!=", ""),
            op("<=", ""),
            op(">=", ""),
            op("<", "<-="),
            op(">", ">="),
        ))
        .boxed(),
    );
    let conjunction = binary(comparison, op("&&", "").boxed());
    binary(conjunction, op("||", "").boxed())
}

/// Returns a full expression parser and a statement header expression parser.
fn expression<'a>(block: BoxedParser<'a, Block>) -> (BoxedParser<'a, Expr>, BoxedParser<'a, Expr>) {
    let full = recursive(|full| operators(full.boxed(), block.clone(), true)).boxed();
    let header = operators(full.clone(), block, false);
    (full, header)
}

enum Tail {
    Assign(&'static str, Vec<Expr>),
    Send(Expr),
    IncDec(&'static str),
}

fn simple_statement<'a>(expr: BoxedParser<'a, Expr>) -> BoxedParser<'a, Stmt> {
    let list = expr
        .clone()
        .separated_by(tok(","))
        .at_least(1)
        .collect::<Vec<_>>();
    let assign_op = choice((
        op(":=", ""),
        op("=", "="),
        op("+=", ""),
        op("-=", ""),
        op("*=", ""),
        op("/=", ""),
        op("%=", ""),
        op("&=", ""),
        op("|=", ""),
        op("^=", ""),
        op("<<=", ""),
        op(">>=", ""),
        op("&^=", ""),
    ));
    let tail = choice((
        assign_op
            .then(list.clone())
            .map(|(op, rhs)| Tail::Assign(op, rhs)),
        op("<-", "").ignore_then(expr).map(Tail::Send),
        choice((op("++", ""), op("--", ""))).map(Tail::IncDec),
    ));

    list.then(tail.or_not())
        .try_map(|(mut lhs, tail): (Vec<Expr>, Option<Tail>), span| {
            if let Some(Tail::Assign(op, rhs)) = tail {
                return Ok(Stmt::Assign {
                    lhs,
                    op: op.to_string(),
                    rhs,
                });
            }
            if lhs.len() != 1 {
                return Err(Rich::custom(span, "expected assignment"));
            }
            let x = lhs.remove(0);
            Ok(match tail {
                Some(Tail::Send(value)) => Stmt::Send(x, value),
                Some(Tail::IncDec(op)) => Stmt::IncDec(x, op.to_string()),
                _ => Stmt::Expr(x),
            })
        })
        .boxed()
}

fn declaration<'a>(expr: BoxedParser<'a, Expr>) -> BoxedParser<'a, Decl> {
    let spec = ident()
        .separated_by(tok(","))
        .at_least(1)
        .collect::<Vec<_>>()
        .then_ignore(type_expr().or_not())
        .then(
            op("=", "=")
                .ignore_then(expr.separated_by(tok(",")).at_least(1).collect::<Vec<_>>())
                .or_not(),
        )
        .map(|(names, values)| ValueSpec {
            names,
            values: values.unwrap_or_default(),
        });
    let specs = choice((
        tok("(")
            .ignore_then(
                spec.clone()
                    .then_ignore(tok(";").repeated())
                    .repeated()
                    .collect::<Vec<_>>(),
            )
            .then_ignore(tok(")")),
        spec.map(|spec| vec![spec]),
    ));

    let type_spec = ident()
        .then_ignore(op("=", "=").or_not())
        .then_ignore(type_expr())
        .ignored();
    let type_specs = choice((
        tok("(")
            .ignore_then(type_spec.clone().then_ignore(tok(";").repeated()).repeated())
            .then_ignore(tok(")"))
            .ignored(),
        type_spec,
    ));

    choice((
        kw("var").ignore_then(specs.clone()).map(Decl::Var),
        kw("const").ignore_then(specs).map(Decl::Const),
        kw("type").ignore_then(type_specs).to(Decl::Type),
    ))
    .boxed()
}

/// Statements separated by `;`, explicit or inserted at line ends.
fn statement_list<'a, P>(stmt: P) -> impl Parser<'a, &'a str, Vec<Stmt>, Err<'a>> + Clone
where
    P: Parser<'a, &'a str, Stmt, Err<'a>> + Clone,
{
    stmt.separated_by(tok(";").repeated().at_least(1))
        .allow_leading()
        .allow_trailing()
        .collect::<Vec<_>>()
}

fn statement<'a>(
    full: BoxedParser<'a, Expr>,
    header: BoxedParser<'a, Expr>,
    block: BoxedParser<'a, Block>,
) -> BoxedParser<'a, Stmt> {
    recursive(|stmt| {
        let list = full
            .clone()
            .separated_by(tok(","))
            .at_least(1)
            .collect::<Vec<_>>();
        let header_list = header
            .clone()
            .separated_by(tok(","))
            .at_least(1)
            .collect::<Vec<_>>();
        let header_simple = simple_statement(header.clone());

        let defer = kw("defer").ignore_then(full.clone()).map(Stmt::Defer);
        let go = kw("go").ignore_then(full.clone()).map(Stmt::Go);
        let ret = kw("return")
            .ignore_then(list.clone().or_not())
            .map(|values| Stmt::Return(values.unwrap_or_default()));

        let if_stmt = kw("if")
            .ignore_then(
                header_simple
                    .clone()
                    .separated_by(tok(";"))
                    .at_least(1)
                    .at_most(2)
                    .collect::<Vec<_>>(),
            )
            .then(block.clone())
            .then(kw("else").ignore_then(stmt.clone()).or_not())
            .map(|((header, then), els)| Stmt::If {
                header,
                then,
                els: els.map(Box::new),
            });

        let range_clause = header_list
            .then_ignore(choice((op(":=", ""), op("=", "="))))
            .or_not()
            .then_ignore(kw("range"))
            .then(header.clone())
            .map(|(lhs, expr)| Stmt::Range {
                lhs: lhs.unwrap_or_default(),
                expr,
            });
        let for_stmt = kw("for")
            .ignore_then(
                choice((range_clause, header_simple.clone()))
                    .or_not()
                    .separated_by(tok(";"))
                    .at_most(3)
                    .collect::<Vec<_>>(),
            )
            .then(block.clone())
            .map(|(header, body)| Stmt::For {
                header: header.into_iter().flatten().collect(),
                body,
            });

        let case_clause = choice((
            kw("case").ignore_then(list.clone()),
            kw("default").to(Vec::new()),
        ))
        .then_ignore(tok(":"))
        .then(statement_list(stmt.clone()))
        .map(|(exprs, body)| CaseClause {
            exprs,
            comm: None,
            body,
        });
        let switch = kw("switch")
            .ignore_then(
                header_simple
                    .or_not()
                    .separated_by(tok(";"))
                    .at_most(2)
                    .collect::<Vec<_>>(),
            )
            .then_ignore(tok("{"))
            .then(case_clause.repeated().collect::<Vec<_>>())
            .then_ignore(tok("}"))
            .map(|(header, clauses)| Stmt::Switch {
                header: header.into_iter().flatten().collect(),
                clauses,
            });

        let comm_clause = choice((
            kw("case")
                .ignore_then(simple_statement(full.clone()))
                .map(Some),
            kw("default").to(None),
        ))
        .then_ignore(tok(":"))
        .then(statement_list(stmt.clone()))
        .map(|(comm, body)| CaseClause {
            exprs: Vec::new(),
            comm: comm.map(Box::new),
            body,
        });
        let select = kw("select")
            .ignore_then(tok("{"))
            .ignore_then(comm_clause.repeated().collect::<Vec<_>>())
            .then_ignore(tok("}"))
            .map(Stmt::Select);

        let branch = choice((
            kw("break").to("break"),
            kw("continue").to("continue"),
            kw("goto").to("goto"),
        ))
        .then(ident().or_not())
        .map(|(word, label)| Stmt::Branch(word.to_string(), label));
        let fallthrough = kw("fallthrough").map(|_| Stmt::Branch("fallthrough".to_string(), None));

        let labeled = ident()
            .then_ignore(op(":", "="))
            .then(stmt.clone())
            .map(|(label, stmt)| Stmt::Labeled(label, Box::new(stmt)));

        choice((
            defer,
            go,
            ret,
            if_stmt,
            for_stmt,
            switch,
            select,
            block.clone().map(Stmt::Block),
            declaration(full.clone()).map(Stmt::Decl),
            branch,
            fallthrough,
            labeled,
            simple_statement(full.clone()),
        ))
        .boxed()
    })
    .boxed()
}

fn block<'a>() -> impl Parser<'a, &'a str, Block, Err<'a>> + Clone {
    recursive(|block| {
        let block = block.boxed();
        let (full, header) = expression(block.clone());
        let stmt = statement(full, header, block);
        tok("{")
            .then(statement_list(stmt))
            .then(tok("}"))
            .map(|((open, stmts), close)| Block {
                stmts,
                span: open.start..close.end,
            })
    })
}

fn source_file<'a>() -> impl Parser<'a, &'a str, File, Err<'a>> {
    let block = block().boxed();
    let (expr, _) = expression(block.clone());

    let import_spec = choice((ident().ignored(), tok(".").ignored()))
        .or_not()
        .then(string_lit())
        .then_ignore(trivia())
        .ignored();
    let import = kw("import")
        .ignore_then(choice((delimited_group('(', ')').ignored(), import_spec)))
        .to(Decl::Import);

    let func = kw("func")
        .ignore_then(delimited_group('(', ')').or_not())
        .then(ident())
        .then_ignore(delimited_group('[', ']').or_not())
        .then_ignore(signature(type_expr()))
        .then(block.or_not())
        .map(|((receiver, name), body)| {
            Decl::Func(FuncDecl {
                name,
                method: receiver.is_some(),
                body,
            })
        });

    let decl = choice((import, func, declaration(expr))).then_ignore(tok(";").repeated());

    trivia()
        .ignore_then(kw("package"))
        .ignore_then(ident())
        .then_ignore(tok(";").repeated())
        .then(decl.repeated().collect::<Vec<_>>())
        .then_ignore(end())
        .map(|(package, decls)| File { package, decls })
}

/// Parse Go source text. Returns rendered parser errors on failure.
pub fn parse(text: &str) -> Result<File, Vec<String>> {
    let text = insert_semicolons(text);
    let result = source_file().parse(text.as_str()).into_result();
    result.map_err(|errors| errors.into_iter().map(|e| e.to_string()).collect())
}
