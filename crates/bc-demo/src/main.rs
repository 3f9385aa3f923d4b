//! Builds a drilled plate with a hinged lid and prints what came out.
//!
//! Usage: `bc-demo [config.ron] [assembly.ron]`

use bc_cad::{CadKernel, CsgKernel, Location, Plane};
use bc_core::{
    Assembly, Bounds, BuildConfig, BuildResult, BuilderOptions, CounterBoreHole, Cuboid, Extrude,
    GridLocations, Hole, Joint, JointValue, Locations, Mirror, Part, PolarLocations, Rectangle,
    Session,
};
use glam::DVec3;

fn main() -> BuildResult<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bc_core=debug,bc_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            tracing::info!("Loading config from {path}");
            BuildConfig::load(&path)?
        }
        None => BuildConfig::default(),
    };
    let output = args.next();

    let kernel = CsgKernel::new(config.kernel.clone());
    let mut session = Session::with_config(&kernel, config);

    let plate = build_plate(&mut session)?;
    let lid = build_lid(&mut session)?;
    tracing::info!(
        "Plate volume {:.1} mm³, lid volume {:.1} mm³",
        kernel.measure(plate.shape())?,
        kernel.measure(lid.shape())?
    );

    let mut assembly = Assembly::new("hinged plate");
    assembly.add_part(plate);
    assembly.add_part(lid);
    assembly.connect("plate", "hinge", "lid", "pin", JointValue::Angle(60.0))?;

    for (label, shape) in assembly.world_shapes() {
        let bb = kernel.bounding_box(&shape)?;
        tracing::info!("{label}: bounds {:?} .. {:?}", bb.min, bb.max);
    }

    if let Some(path) = output {
        assembly.save(&path)?;
    }
    Ok(())
}

/// 80 x 60 x 10 plate with a 3 x 2 grid of through holes and a bolt circle
/// of counterbored holes
fn build_plate(session: &mut Session<'_>) -> BuildResult<Part> {
    let builder = session.build_part(BuilderOptions::default(), |s| {
        s.build_sketch(BuilderOptions::default(), |s| {
            s.add(&Rectangle::new(80.0, 60.0))?;
            Ok(())
        })?;
        s.extrude(Extrude::new(10.0))?;

        s.locate(&Locations::from_points([DVec3::new(0.0, 0.0, 10.0)]), |s| {
            s.locate(&GridLocations::new(25.0, 25.0, 3, 2), |s| s.add(&Hole::new(3.0)))?;
            s.locate(&PolarLocations::new(6.0, 4), |s| {
                s.add(&CounterBoreHole::new(0.8, 1.5, 2.0))
            })
        })?;
        Ok(())
    })?;

    let mut plate = builder.into_part("plate")?;
    plate.add_joint(Joint::revolute(
        "hinge",
        Location::from_xyz(40.0, 0.0, 10.0) * Location::from_axis_angle(DVec3::X, -90.0),
        Some(Bounds::new(0.0, 180.0)),
    ))?;
    Ok(plate)
}

/// Lid plate hinged along its short edge, with a pair of handle tabs
fn build_lid(session: &mut Session<'_>) -> BuildResult<Part> {
    let builder = session.build_part(BuilderOptions::default(), |s| {
        s.add(&Cuboid::new(40.0, 60.0, 4.0))?;
        s.locate(&Locations::from_points([DVec3::new(15.0, 20.0, 3.0)]), |s| {
            s.add(&Cuboid::new(6.0, 6.0, 2.0))
        })?;
        s.mirror(Mirror::new(Plane::XZ))?;
        Ok(())
    })?;

    let mut lid = builder.into_part("lid")?;
    lid.add_joint(Joint::rigid(
        "pin",
        Location::from_xyz(-20.0, 0.0, -2.0) * Location::from_axis_angle(DVec3::X, -90.0),
    ))?;
    Ok(lid)
}
