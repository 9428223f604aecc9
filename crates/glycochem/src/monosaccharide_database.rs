// Standard Library Imports
use std::{collections::hash_map::Entry, ops::Deref};

// External Crate Imports
use ahash::{HashMap, HashMapExt};
use knuffel::{
    Decode, DecodeScalar,
    ast::{self, Integer, Literal, Radix, TypeName},
    decode::{Context, Kind},
    errors::{DecodeError, ExpectedType},
    span::{Span, Spanned},
    traits::ErrorSpan,
};
use miette::{Diagnostic, LabeledSpan, NamedSource, Result};
use thiserror::Error;

// Local Crate Imports
use crate::{Mass, MonosaccharideDatabase, MonosaccharideDescription};

// Constants ===========================================================================================================

const BUILT_IN_FILE_NAME: &str = "monosaccharides.kdl";
const BUILT_IN_KDL: &str = include_str!("../data/monosaccharides.kdl");

// Public API ==========================================================================================================

impl MonosaccharideDatabase {
    pub fn from_kdl(file_name: impl AsRef<str>, kdl_text: impl AsRef<str>) -> Result<Self> {
        let parsed_db: MonosaccharideDatabaseKdl =
            knuffel::parse(file_name.as_ref(), kdl_text.as_ref())?;
        parsed_db
            .validate()
            .map_err(|e| e.finalize(file_name, kdl_text).into())
    }

    #[must_use]
    pub fn mass(&self, abbr: &str) -> Option<Mass> {
        self.monosaccharides.get(abbr).map(|m| m.mass)
    }

    #[must_use]
    pub fn get(&self, abbr: &str) -> Option<&MonosaccharideDescription> {
        self.monosaccharides.get(abbr)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.monosaccharides.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monosaccharides.is_empty()
    }
}

impl Default for MonosaccharideDatabase {
    fn default() -> Self {
        // SAFETY: The built-in database is validated by this module's tests, so this can never fail at runtime
        Self::from_kdl(BUILT_IN_FILE_NAME, BUILT_IN_KDL).unwrap()
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct MonosaccharideDatabaseKdl {
    #[knuffel(child, unwrap(children))]
    monosaccharides: Vec<MonosaccharideKdl>,
}

#[derive(Debug, Decode)]
#[knuffel(span_type=Span)]
struct MonosaccharideKdl {
    #[knuffel(span)]
    span: Span,
    #[knuffel(node_name)]
    abbr: String,
    #[knuffel(argument)]
    name: String,
    #[knuffel(argument)]
    mass: DecimalKdl,
}

// Lossless Parsing of KDL Numbers to Decimal ==========================================================================

#[derive(Debug, Default)]
struct DecimalKdl(Mass);

impl<S: ErrorSpan> DecodeScalar<S> for DecimalKdl {
    fn type_check(type_name: &Option<Spanned<TypeName, S>>, ctx: &mut Context<S>) {
        if let Some(t) = type_name {
            ctx.emit_error(DecodeError::TypeName {
                span: t.span().clone(),
                found: Some(t.deref().clone()),
                expected: ExpectedType::no_type(),
                rust_type: "Decimal",
            });
        }
    }

    fn raw_decode(
        value: &Spanned<Literal, S>,
        ctx: &mut Context<S>,
    ) -> Result<Self, DecodeError<S>> {
        match &**value {
            Literal::Decimal(ast::Decimal(s)) | Literal::Int(Integer(Radix::Dec, s)) => {
                let res = if s.contains(['e', 'E']) {
                    Mass::from_scientific(s)
                } else {
                    Mass::from_str_exact(s)
                };
                match res {
                    Ok(d) => Ok(Self(d)),
                    Err(e) => {
                        ctx.emit_error(DecodeError::conversion(value, Box::new(e)));
                        Ok(Self::default())
                    }
                }
            }
            unsupported => {
                ctx.emit_error(DecodeError::unsupported(
                    value,
                    format!(
                        "expected a decimal number, found {}",
                        Kind::from(unsupported)
                    ),
                ));
                Ok(Self::default())
            }
        }
    }
}

// Database Validation =================================================================================================

impl MonosaccharideDatabaseKdl {
    fn validate(self) -> Result<MonosaccharideDatabase, ValidationErrorKind> {
        let mut monosaccharides = HashMap::with_capacity(self.monosaccharides.len());
        let mut defined_at = HashMap::with_capacity(self.monosaccharides.len());

        for MonosaccharideKdl {
            span,
            abbr,
            name,
            mass: DecimalKdl(mass),
        } in self.monosaccharides
        {
            if mass.is_sign_negative() || mass.is_zero() {
                return Err(ValidationErrorKind::NonPositiveMass(span, abbr));
            }

            match defined_at.entry(abbr.clone()) {
                Entry::Occupied(e) => {
                    return Err(ValidationErrorKind::DuplicateMonosaccharide(
                        *e.get(),
                        span,
                        abbr,
                    ));
                }
                Entry::Vacant(e) => e.insert(span),
            };

            monosaccharides.insert(abbr, MonosaccharideDescription { name, mass });
        }

        Ok(MonosaccharideDatabase { monosaccharides })
    }
}

// Validation Error Types and Trait Implementations  ===================================================================

#[derive(Debug, Error)]
#[error("failed to validate monosaccharide database file")]
struct ValidationError {
    kdl: NamedSource<String>,
    #[source]
    kind: ValidationErrorKind,
}

// NOTE: Manually implemented so that the labels can be pulled out of `self.kind`
impl Diagnostic for ValidationError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.kdl)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(self.kind.labels().into_iter().map(|(s, l)| {
            LabeledSpan::new_with_span(Some(l.to_owned()), *s)
        })))
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        Some(&self.kind)
    }
}

#[derive(Clone, Debug, Diagnostic, Error)]
enum ValidationErrorKind {
    #[error("the monosaccharide {2:?} has already been defined")]
    #[diagnostic(help("remove the duplicate entry, or give one of them a different name"))]
    DuplicateMonosaccharide(Span, Span, String),

    #[error("the monosaccharide {1:?} must have a mass greater than zero")]
    #[diagnostic(help("double-check the sign and magnitude of this mass"))]
    NonPositiveMass(Span, String),
}

impl ValidationErrorKind {
    fn labels(&self) -> Vec<(&Span, &'static str)> {
        match self {
            Self::DuplicateMonosaccharide(s1, s2, _) => {
                vec![(s1, "first defined here"), (s2, "then again here")]
            }
            Self::NonPositiveMass(s, _) => vec![(s, "non-positive mass")],
        }
    }

    fn finalize(self, file_name: impl AsRef<str>, kdl: impl AsRef<str>) -> ValidationError {
        let kdl = NamedSource::new(file_name, kdl.as_ref().to_owned());
        ValidationError { kdl, kind: self }
    }
}

// Module Tests ========================================================================================================
