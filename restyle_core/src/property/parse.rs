// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text → [`PropertyValue`] parsing.
//!
//! Values are tokenized with `cssparser`; colors are handed to
//! `csscolorparser`. Parsing is strict: trailing tokens, keywords outside the
//! property's accepted set, and unknown units are all rejected.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};

use super::color::Color;
use super::easing::{Easing, StepPosition};
use super::float::{PropertyFloat, Unit};
use super::id::PropertyId;
use super::keyword::Keyword;
use super::lists::{AnimationList, AnimationSpec, Iterations, TransitionList, TransitionSpec};
use super::transform::{Transform, TransformFunction};
use super::{Category, PropertyValue};
use crate::error::StyleError;

type ParseResult<'i, T> = Result<T, ParseError<'i, ()>>;

/// Parses `text` as a value for `id`.
///
/// # Errors
///
/// Returns [`StyleError::InvalidValue`] when the text is not in the value
/// space of `id`.
pub fn parse_value(id: PropertyId, text: &str) -> Result<PropertyValue, StyleError> {
    let invalid = || StyleError::InvalidValue {
        property: id,
        value: text.to_string(),
    };
    if id.category() == Category::Color {
        return parse_color(text).map(PropertyValue::Color).ok_or_else(invalid);
    }
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let value = parser
        .parse_entirely(|p| value_for(id, p))
        .map_err(|_| invalid())?;
    if id.accepts(&value) {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// Splits a `style` attribute into `(name, value)` declarations.
///
/// Malformed declarations are skipped.
pub(crate) fn parse_declarations(text: &str) -> Vec<(String, String)> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut out = Vec::new();
    while !parser.is_exhausted() {
        let declaration = parser.parse_until_after(Delimiter::Semicolon, |p| {
            let name = p.expect_ident_cloned()?;
            p.expect_colon()?;
            let start = p.position();
            while p.next().is_ok() {}
            let value = p.slice_from(start).trim().to_string();
            Ok::<_, ParseError<'_, ()>>((name.as_ref().to_string(), value))
        });
        match declaration {
            Ok((name, value)) if !value.is_empty() => out.push((name, value)),
            Ok((name, _)) => log::warn!("empty declaration for {name}"),
            Err(err) => log::warn!("skipping malformed declaration: {err:?}"),
        }
    }
    out
}

fn unexpected<'i>(input: &Parser<'i, '_>) -> ParseError<'i, ()> {
    input.new_custom_error(())
}

fn parse_color(text: &str) -> Option<Color> {
    let parsed = csscolorparser::parse(text.trim()).ok()?;
    let [r, g, b, a] = parsed.to_rgba8();
    Some(Color::rgba(r, g, b, a))
}

fn value_for<'i>(id: PropertyId, input: &mut Parser<'i, '_>) -> ParseResult<'i, PropertyValue> {
    if let Ok(keyword) = input.try_parse(|p| keyword(id, p)) {
        return Ok(PropertyValue::Keyword(keyword));
    }
    match id.category() {
        Category::Keyword => Err(unexpected(input)),
        Category::Float => float(input).map(PropertyValue::Float),
        Category::Color => Err(unexpected(input)),
        Category::String => string(input).map(PropertyValue::String),
        Category::Transform => transform(input).map(PropertyValue::Transform),
        Category::Transitions => transitions(input).map(PropertyValue::Transitions),
        Category::Animations => animations(input).map(PropertyValue::Animations),
    }
}

fn keyword<'i>(id: PropertyId, input: &mut Parser<'i, '_>) -> ParseResult<'i, Keyword> {
    let ident = input.expect_ident_cloned()?;
    match Keyword::from_name(&ident) {
        Some(k) if id.keywords().contains(&k) => Ok(k),
        _ => Err(unexpected(input)),
    }
}

fn float<'i>(input: &mut Parser<'i, '_>) -> ParseResult<'i, PropertyFloat> {
    let token = input.next()?.clone();
    match token {
        Token::Number { value, .. } => Ok(PropertyFloat::number(value)),
        Token::Percentage { unit_value, .. } => Ok(PropertyFloat::percent(unit_value * 100.0)),
        Token::Dimension { value, unit, .. } => match Unit::from_suffix(&unit) {
            Some(unit) => Ok(PropertyFloat::new(value, unit)),
            None => Err(unexpected(input)),
        },
        _ => Err(unexpected(input)),
    }
}

fn string<'i>(input: &mut Parser<'i, '_>) -> ParseResult<'i, String> {
    let mut words: Vec<String> = Vec::new();
    while !input.is_exhausted() {
        let token = input.next()?.clone();
        match token {
            Token::QuotedString(s) | Token::UnquotedUrl(s) | Token::Ident(s) => {
                words.push(s.as_ref().to_string());
            }
            Token::Function(name) if name.eq_ignore_ascii_case("url") => {
                let url = input.parse_nested_block(|p| -> ParseResult<'i, _> {
                    Ok(p.expect_string_cloned()?)
                })?;
                words.push(url.as_ref().to_string());
            }
            Token::Comma => words.push(",".to_string()),
            _ => return Err(unexpected(input)),
        }
    }
    if words.is_empty() {
        return Err(unexpected(input));
    }
    Ok(words.join(" ").replace(" ,", ","))
}

fn transform<'i>(input: &mut Parser<'i, '_>) -> ParseResult<'i, Transform> {
    if input.try_parse(|p| p.expect_ident_matching("none")).is_ok() {
        return Ok(Transform::none());
    }
    let mut functions = Vec::new();
    while !input.is_exhausted() {
        let name = input.expect_function()?.as_ref().to_ascii_lowercase();
        functions.push(input.parse_nested_block(|args| transform_function(&name, args))?);
    }
    if functions.is_empty() {
        return Err(unexpected(input));
    }
    Ok(Transform::new(functions))
}

fn transform_function<'i>(
    name: &str,
    args: &mut Parser<'i, '_>,
) -> ParseResult<'i, TransformFunction> {
    use TransformFunction as F;

    let floats = parse_float_args(args)?;
    let zero = PropertyFloat::px(0.0);
    let one = PropertyFloat::number(1.0);
    let out = match (name, floats.as_slice()) {
        ("translate", &[x]) => F::Translate(x, zero, zero),
        ("translate", &[x, y]) => F::Translate(x, y, zero),
        ("translate3d", &[x, y, z]) => F::Translate(x, y, z),
        ("translatex", &[v]) => F::TranslateX(v),
        ("translatey", &[v]) => F::TranslateY(v),
        ("translatez", &[v]) => F::TranslateZ(v),
        ("scale", &[s]) => F::Scale(s, s, one),
        ("scale", &[x, y]) => F::Scale(x, y, one),
        ("scale3d", &[x, y, z]) => F::Scale(x, y, z),
        ("scalex", &[v]) => F::ScaleX(v),
        ("scaley", &[v]) => F::ScaleY(v),
        ("rotate" | "rotatez", &[a]) => F::Rotate(a),
        ("rotatex", &[a]) => F::RotateX(a),
        ("rotatey", &[a]) => F::RotateY(a),
        ("skew", &[x]) => F::Skew(x, PropertyFloat::deg(0.0)),
        ("skew", &[x, y]) => F::Skew(x, y),
        ("skewx", &[x]) => F::Skew(x, PropertyFloat::deg(0.0)),
        ("skewy", &[y]) => F::Skew(PropertyFloat::deg(0.0), y),
        ("perspective", &[d]) => F::Perspective(d),
        ("matrix", m) if m.len() == 6 => F::Matrix(numbers(m)),
        ("matrix3d", m) if m.len() == 16 => F::Matrix3d(numbers(m)),
        _ => return Err(unexpected(args)),
    };
    Ok(out)
}

fn numbers<const N: usize>(args: &[PropertyFloat]) -> [f32; N] {
    core::array::from_fn(|i| args[i].value)
}

fn parse_float_args<'i>(args: &mut Parser<'i, '_>) -> ParseResult<'i, Vec<PropertyFloat>> {
    let mut out = Vec::new();
    loop {
        out.push(float(args)?);
        if args.is_exhausted() {
            return Ok(out);
        }
        args.expect_comma()?;
    }
}

fn time<'i>(input: &mut Parser<'i, '_>) -> ParseResult<'i, f64> {
    let token = input.next()?.clone();
    match token {
        Token::Dimension { value, unit, .. } if unit.eq_ignore_ascii_case("s") => {
            Ok(f64::from(value))
        }
        Token::Dimension { value, unit, .. } if unit.eq_ignore_ascii_case("ms") => {
            Ok(f64::from(value) / 1000.0)
        }
        Token::Number { value, .. } if value == 0.0 => Ok(0.0),
        _ => Err(unexpected(input)),
    }
}

fn easing<'i>(input: &mut Parser<'i, '_>) -> ParseResult<'i, Easing> {
    let token = input.next()?.clone();
    match token {
        Token::Ident(name) => Easing::from_name(&name).ok_or_else(|| unexpected(input)),
        Token::Function(name) if name.eq_ignore_ascii_case("cubic-bezier") => {
            input.parse_nested_block(|args| -> ParseResult<'i, Easing> {
                let v = parse_float_args(args)?;
                match v.as_slice() {
                    &[x1, y1, x2, y2] if (0.0..=1.0).contains(&x1.value)
                        && (0.0..=1.0).contains(&x2.value) =>
                    {
                        Ok(Easing::CubicBezier(x1.value, y1.value, x2.value, y2.value))
                    }
                    _ => Err(unexpected(args)),
                }
            })
        }
        Token::Function(name) if name.eq_ignore_ascii_case("steps") => {
            input.parse_nested_block(|args| -> ParseResult<'i, Easing> {
                let n = args.expect_integer()?;
                let position = if args.is_exhausted() {
                    StepPosition::End
                } else {
                    args.expect_comma()?;
                    let ident = args.expect_ident_cloned()?;
                    match ident.to_ascii_lowercase().as_str() {
                        "start" | "jump-start" => StepPosition::Start,
                        "end" | "jump-end" => StepPosition::End,
                        _ => return Err(unexpected(args)),
                    }
                };
                match u32::try_from(n) {
                    Ok(n) if n > 0 => Ok(Easing::Steps(n, position)),
                    _ => Err(unexpected(args)),
                }
            })
        }
        _ => Err(unexpected(input)),
    }
}

fn transitions<'i>(input: &mut Parser<'i, '_>) -> ParseResult<'i, TransitionList> {
    if input.try_parse(|p| p.expect_ident_matching("none")).is_ok() {
        return Ok(TransitionList::None);
    }
    let specs = input.parse_comma_separated(transition_spec)?;
    match specs.as_slice() {
        [spec] if spec.property.is_none() => Ok(TransitionList::All(spec.clone())),
        _ => Ok(TransitionList::List(specs)),
    }
}

fn transition_spec<'i>(input: &mut Parser<'i, '_>) -> ParseResult<'i, TransitionSpec> {
    let mut spec = TransitionSpec::new(None, 0.0, Easing::default());
    let mut times = 0;
    let mut named = false;
    while !input.is_exhausted() {
        if let Ok(t) = input.try_parse(time) {
            match times {
                0 => spec.duration = t,
                1 => spec.delay = t,
                _ => return Err(unexpected(input)),
            }
            times += 1;
        } else if let Ok(e) = input.try_parse(easing) {
            spec.easing = e;
        } else {
            let ident = input.expect_ident_cloned()?;
            if named {
                return Err(unexpected(input));
            }
            named = true;
            if !ident.eq_ignore_ascii_case("all") {
                let id = PropertyId::from_name(&ident).ok_or_else(|| unexpected(input))?;
                spec.property = Some(id);
            }
        }
    }
    Ok(spec)
}

fn animations<'i>(input: &mut Parser<'i, '_>) -> ParseResult<'i, AnimationList> {
    if input.try_parse(|p| p.expect_ident_matching("none")).is_ok() {
        return Ok(AnimationList::default());
    }
    input.parse_comma_separated(animation_spec).map(AnimationList)
}

fn animation_spec<'i>(input: &mut Parser<'i, '_>) -> ParseResult<'i, AnimationSpec> {
    let mut spec = AnimationSpec::new(String::new(), 0.0);
    let mut times = 0;
    while !input.is_exhausted() {
        if let Ok(t) = input.try_parse(time) {
            match times {
                0 => spec.duration = t,
                1 => spec.delay = t,
                _ => return Err(unexpected(input)),
            }
            times += 1;
            continue;
        }
        if let Ok(e) = input.try_parse(easing) {
            spec.easing = e;
            continue;
        }
        let token = input.next()?.clone();
        match token {
            Token::Number {
                int_value: Some(n), ..
            } if n >= 0 => spec.iterations = Iterations::Finite(n.unsigned_abs()),
            Token::Ident(ident) => match ident.to_ascii_lowercase().as_str() {
                "infinite" => spec.iterations = Iterations::Infinite,
                "alternate" => spec.alternate = true,
                "normal" => spec.alternate = false,
                "paused" => spec.paused = true,
                "running" => spec.paused = false,
                _ if spec.name.is_empty() => spec.name = ident.as_ref().to_string(),
                _ => return Err(unexpected(input)),
            },
            Token::QuotedString(name) if spec.name.is_empty() => {
                spec.name = name.as_ref().to_string();
            }
            _ => return Err(unexpected(input)),
        }
    }
    if spec.name.is_empty() {
        return Err(unexpected(input));
    }
    Ok(spec)
}
