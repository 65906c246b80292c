//! The backend seam.

use spindle_ir::CircuitGraph;

use crate::error::HalResult;
use crate::options::ExecuteOptions;
use crate::result::ExecutionResult;

/// Something that can execute a circuit graph end to end.
pub trait Backend: Send + Sync {
    /// Backend name.
    fn name(&self) -> &str;

    /// Compile and run `graph`.
    fn execute(
        &self,
        graph: &(dyn CircuitGraph + Sync),
        options: &ExecuteOptions,
    ) -> HalResult<ExecutionResult>;
}
