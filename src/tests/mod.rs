/// ==============================================================================================
/// ======================================= Test suite ==============================================
/// ==============================================================================================
///
/// In-tree test modules, one file per concern (matching where the project this crate is grounded
/// on keeps its own `src/tests/`), rather than a top-level `tests/` directory.

mod support;

mod evolve_scenarios;
