//! Example usage of the rigidtrack library
//!
//! Builds the process model for two rigid bodies and runs a few predict steps
//! with both the Gaussian and the sampled predict.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rigidtrack::filters::particle::ParticleCloud;
use rigidtrack::prelude::*;

fn main() -> Result<()> {
    println!("rigidtrack: rigid body process models");
    println!("======================================\n");

    let params = ObjectTransitionParams::new(
        0.002, // Linear acceleration sigma
        0.01,  // Angular acceleration sigma
        0.8,   // Velocity factor
        2,     // Tracked bodies
    );
    let builder = ObjectTransitionModelBuilder::new(params)?;
    let layout = builder.layout();
    let model = builder.build_model();

    println!(
        "Bodies: {}  state dim: {}  noise dim: {}",
        layout.part_count(),
        model.state_dim(),
        model.noise_dim()
    );

    // Body 0 moves along x, body 1 spins about z
    let mut mean = vec![0.0; layout.state_dim()];
    mean[layout.velocity_range(0).start] = 0.05;
    mean[layout.velocity_range(1).start + 5] = 0.2;
    let initial = StateVector::from_vec(mean);

    let variances = nalgebra::DVector::from_element(layout.state_dim(), 1e-4);
    let mut belief = GaussianBelief::with_diagonal_covariance(initial.clone(), &variances)?;
    let input = InputVector::zeros(model.input_dim());

    println!("\nGaussian predict:");
    for step in 1..=5 {
        belief = predict(&model, &belief, &input)?;
        let pose0 = belief.pose(&layout, 0);
        let pose1 = belief.pose(&layout, 1);
        println!(
            "  step {}: body0 x={:.4}  body1 yaw={:.4}  uncertainty={:.6}",
            step,
            pose0[0],
            pose1[5],
            belief.uncertainty()
        );
    }

    println!("\nSampled predict:");
    let transition = builder.build();
    let mut cloud = ParticleCloud::replicate(&initial, 200)?;
    let mut rng = StdRng::seed_from_u64(2015);
    for step in 1..=5 {
        cloud.predict(transition.as_ref(), &input, &mut rng)?;
        let mean = cloud.mean();
        println!(
            "  step {}: body0 x={:.4}  body1 yaw={:.4}",
            step,
            mean.index(layout.pose_range(0).start),
            mean.index(layout.pose_range(1).start + 5)
        );
    }

    Ok(())
}
