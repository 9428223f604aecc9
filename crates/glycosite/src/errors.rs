use glycochem::Mass;
use miette::Diagnostic;
use thiserror::Error;

pub type Result<T, E = Box<GlycositeError>> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum GlycositeError {
    #[diagnostic(help(
        "choose a collision policy that keeps either the first or the last glycan listed for a shared mass"
    ))]
    #[error("the glycans {kept:?} and {rejected:?} both have a mass of {mass} Da")]
    MassCollision {
        mass: Mass,
        kept: String,
        rejected: String,
    },

    #[diagnostic(help("valid policies are \"last-wins\", \"first-wins\", and \"reject\""))]
    #[error("{policy:?} is not a known mass-collision policy")]
    UnknownCollisionPolicy { policy: String },
}
