//! Text form of kinetic laws.
//!
//! Grammar (usual precedence, `^` and `**` are right-associative):
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := number | identifier | function '(' expr ')' | '(' expr ')'
//! ```
//! Integer literals become `IntValue`, everything else numeric becomes `RealValue`. A
//! minus sign directly in front of a literal is folded into the literal.
//! Identifiers are resolved to species through the caller's resolver and become symbols
//! otherwise.
use crate::IR::species_node::SpeciesId;
use crate::KineticLaw::kinetic_law::KineticLaw;
use crate::error::{Reb2SacError, Reb2SacResult};
use regex::Regex;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Int(i64),
    Real(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(text: &str) -> Reb2SacResult<Vec<(Token, usize)>> {
    let re = Regex::new(
        r"^\s*(?:(?P<num>(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)|(?P<ident>[A-Za-z_][A-Za-z0-9_]*)|(?P<op>\*\*|[-+*/^()]))",
    )
    .map_err(|e| Reb2SacError::failing("kinetic law parser", "compile tokenizer", e.to_string()))?;
    let mut tokens = Vec::new();
    let mut position = 0;
    while position < text.len() {
        let rest = &text[position..];
        if rest.trim().is_empty() {
            break;
        }
        let caps = re.captures(rest).ok_or_else(|| Reb2SacError::Parse {
            position,
            message: format!("unexpected character in '{}'", rest.trim()),
        })?;
        let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
        let token = if let Some(num) = caps.name("num") {
            let literal = num.as_str();
            let is_integer = literal.chars().all(|c| c.is_ascii_digit());
            match (is_integer, literal.parse::<i64>()) {
                (true, Ok(value)) => Token::Int(value),
                _ => Token::Real(literal.parse::<f64>().map_err(|e| Reb2SacError::Parse {
                    position,
                    message: format!("bad number '{}': {}", literal, e),
                })?),
            }
        } else if let Some(ident) = caps.name("ident") {
            Token::Ident(ident.as_str().to_string())
        } else {
            match caps.name("op").map(|m| m.as_str()) {
                Some("+") => Token::Plus,
                Some("-") => Token::Minus,
                Some("*") => Token::Star,
                Some("/") => Token::Slash,
                Some("^") | Some("**") => Token::Caret,
                Some("(") => Token::LParen,
                Some(")") => Token::RParen,
                _ => {
                    return Err(Reb2SacError::Parse {
                        position,
                        message: "unknown operator".to_string(),
                    });
                }
            }
        };
        // token start, skipping the leading whitespace
        let start = position + (rest.len() - rest.trim_start().len());
        tokens.push((token, start));
        position += whole;
    }
    Ok(tokens)
}

struct Parser<'a, F: Fn(&str) -> Option<SpeciesId>> {
    tokens: Vec<(Token, usize)>,
    index: usize,
    text_len: usize,
    resolve_species: &'a F,
}

impl<'a, F: Fn(&str) -> Option<SpeciesId>> Parser<'a, F> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|(t, _)| t)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.index)
            .map(|(_, p)| *p)
            .unwrap_or(self.text_len)
    }

    fn error<T>(&self, message: &str) -> Reb2SacResult<T> {
        Err(Reb2SacError::Parse {
            position: self.position(),
            message: message.to_string(),
        })
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).map(|(t, _)| t.clone());
        self.index += 1;
        token
    }

    fn expr(&mut self) -> Reb2SacResult<KineticLaw> {
        let mut law = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.next();
                    law = law + self.term()?;
                }
                Some(Token::Minus) => {
                    self.next();
                    law = law - self.term()?;
                }
                _ => return Ok(law),
            }
        }
    }

    fn term(&mut self) -> Reb2SacResult<KineticLaw> {
        let mut law = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.next();
                    law = law * self.unary()?;
                }
                Some(Token::Slash) => {
                    self.next();
                    law = law / self.unary()?;
                }
                _ => return Ok(law),
            }
        }
    }

    fn unary(&mut self) -> Reb2SacResult<KineticLaw> {
        match self.peek() {
            Some(Token::Minus) => {
                self.next();
                let literal_follows =
                    matches!(self.peek(), Some(Token::Int(_)) | Some(Token::Real(_)));
                let operand = self.unary()?;
                match operand {
                    KineticLaw::IntValue(v) if literal_follows => Ok(match v.checked_neg() {
                        Some(negated) => KineticLaw::int(negated),
                        None => -KineticLaw::int(v),
                    }),
                    KineticLaw::RealValue(v) if literal_follows => Ok(KineticLaw::real(-v)),
                    other => Ok(-other),
                }
            }
            Some(Token::Plus) => {
                self.next();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Reb2SacResult<KineticLaw> {
        let base = self.primary()?;
        if let Some(Token::Caret) = self.peek() {
            self.next();
            let exponent = self.unary()?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Reb2SacResult<KineticLaw> {
        match self.next() {
            Some(Token::Int(v)) => Ok(KineticLaw::int(v)),
            Some(Token::Real(v)) => Ok(KineticLaw::real(v)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect_closing()?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.next();
                    let argument = self.expr()?;
                    self.expect_closing()?;
                    return match name.as_str() {
                        "exp" => Ok(argument.exp()),
                        "ln" | "log" => Ok(argument.ln()),
                        _ => {
                            self.index -= 1;
                            self.error(&format!("unknown function '{}'", name))
                        }
                    };
                }
                match (self.resolve_species)(&name) {
                    Some(species) => Ok(KineticLaw::species(species)),
                    None => Ok(KineticLaw::symbol(name)),
                }
            }
            Some(_) => {
                self.index -= 1;
                self.error("expected a number, a name or '('")
            }
            None => self.error("unexpected end of kinetic law"),
        }
    }

    fn expect_closing(&mut self) -> Reb2SacResult<()> {
        match self.peek() {
            Some(Token::RParen) => {
                self.next();
                Ok(())
            }
            _ => self.error("expected ')'"),
        }
    }
}

/// Parses `text` into a kinetic law. `resolve_species` maps an identifier to a species
/// of the surrounding IR; unresolved identifiers become symbols.
pub fn parse_kinetic_law<F>(text: &str, resolve_species: F) -> Reb2SacResult<KineticLaw>
where
    F: Fn(&str) -> Option<SpeciesId>,
{
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(Reb2SacError::Parse {
            position: 0,
            message: "empty kinetic law".to_string(),
        });
    }
    let mut parser = Parser {
        tokens,
        index: 0,
        text_len: text.len(),
        resolve_species: &resolve_species,
    };
    let law = parser.expr()?;
    if parser.index < parser.tokens.len() {
        return parser.error("unexpected trailing input");
    }
    Ok(law)
}
