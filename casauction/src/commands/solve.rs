use cas_solver::PolicyKind;
use clap::ValueEnum;

// This explicitly articulates the available policies for the `solve` subcommand
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyFlag {
    FirstPrice,
    Vickrey,
    Combinatorial,
}

impl From<PolicyFlag> for PolicyKind {
    fn from(flag: PolicyFlag) -> Self {
        match flag {
            PolicyFlag::FirstPrice => PolicyKind::FirstPrice,
            PolicyFlag::Vickrey => PolicyKind::Vickrey,
            PolicyFlag::Combinatorial => PolicyKind::Combinatorial,
        }
    }
}
