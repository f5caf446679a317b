use ndarray::Array1;
use pipeline_physics::stress_state::StressState;

/// Per-member input ratios reported alongside results.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedQuantities {
    pub r_ratio: Array1<f64>,
    pub fugacity_ratio: Array1<f64>,
    /// Uncracked hoop stress as percent of yield strength.
    pub percent_smys: Array1<f64>,
    /// Initial aspect ratio a0 / 2c0.
    pub a_over_2c: Array1<f64>,
    /// Wall thickness over outer radius.
    pub t_over_r: Array1<f64>,
    pub initial_depth: Array1<f64>,
}

impl DerivedQuantities {
    pub fn from_stress_state(state: &StressState) -> Self {
        let pipe = state.pipe();
        let environment = state.environment();
        let initial_depth = state.initial_depth();
        DerivedQuantities {
            r_ratio: environment.r_ratio(),
            fugacity_ratio: environment.fugacity_ratio(),
            percent_smys: state.percent_smys(),
            a_over_2c: &initial_depth / state.defect().flaw_length(),
            t_over_r: pipe.wall_thickness() / &pipe.outer_radius(),
            initial_depth,
        }
    }
}
