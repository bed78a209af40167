use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use formats::{AutoPostingResult, parse_auto_posting_results};
use foundation::math::{Ecef, Vec2, from_cartesian_to_geographic};
use map::{AutoPostingClient, MapConfig, MapController, MapService};
use scene::components::Graphics;
use scene::input::{ScreenInput, ScreenSpaceEventType};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Simulation step used while waiting for camera flights (seconds).
const FRAME_S: f64 = 1.0 / 60.0;
/// Frames to run before giving up on a flight.
const MAX_FRAMES: usize = 60 * 30;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless landscape-axis map driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fly the camera to a point and report where it lands
    Fly {
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        alt: f64,
    },

    /// List auto-posting results and optionally extrude one of them
    Postings(PostingsArgs),

    /// Run one landscape-axis session from scripted pointer input
    Axis {
        /// First click, canvas pixels: x,y
        #[arg(value_parser = parse_pixel)]
        start: Vec2,

        /// Second click, canvas pixels: x,y
        #[arg(value_parser = parse_pixel)]
        end: Vec2,

        /// Pointer moves between the two clicks
        #[arg(long = "move", value_parser = parse_pixel)]
        moves: Vec<Vec2>,
    },
}

#[derive(Args, Debug)]
struct PostingsArgs {
    /// Read results from a JSON file
    #[arg(long, conflicts_with = "fetch", required_unless_present = "fetch")]
    file: Option<PathBuf>,

    /// Query the posting service (LANDAXIS_POSTING_URL, LANDAXIS_POSTING_GROUP)
    #[arg(long)]
    fetch: bool,

    /// Extrude the result at this index
    #[arg(long)]
    show: Option<usize>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main(Cli::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main(cli: Cli) -> CliResult<()> {
    let config = MapConfig::from_env()?;
    let mut map = MapService::init_viewer(&config.container, config.viewer_options())?;
    let mut controller = MapController::new();

    match cli.command {
        Command::Fly { lon, lat, alt } => {
            controller.fly_to(&mut map, lon, lat, alt);
            settle(&mut map);
            print_camera(&map);
        }
        Command::Postings(args) => {
            cmd_postings(&config, &mut map, &mut controller, args).await?;
        }
        Command::Axis { start, end, moves } => {
            cmd_axis(&mut map, &mut controller, start, end, &moves)?;
        }
    }

    Ok(())
}

async fn cmd_postings(
    config: &MapConfig,
    map: &mut MapService,
    controller: &mut MapController,
    args: PostingsArgs,
) -> CliResult<()> {
    if let Some(path) = &args.file {
        let payload = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("read {path:?}: {e}"))?;
        controller.set_auto_posting_results(parse_auto_posting_results(&payload)?);
    } else {
        let client = AutoPostingClient::new(&config.posting_url);
        controller
            .load_auto_posting_results(&client, &config.posting_group)
            .await;
    }

    for (index, result) in controller.auto_posting_results().iter().enumerate() {
        print_result(index, result);
    }

    if let Some(index) = args.show {
        let shown = controller.show_auto_posting(map, index)?;
        settle(map);
        println!("extruded {shown} polygon(s)");
        for entity in map.viewer().entities().iter() {
            if let Graphics::Polygon(polygon) = &entity.graphics {
                println!(
                    "  {:<24} vertices={:<4} height={}",
                    entity.name.as_deref().unwrap_or("-"),
                    polygon.hierarchy.len(),
                    polygon.extruded_height.unwrap_or(0.0),
                );
            }
        }
        print_camera(map);
    }

    Ok(())
}

fn cmd_axis(
    map: &mut MapService,
    controller: &mut MapController,
    start: Vec2,
    end: Vec2,
    moves: &[Vec2],
) -> CliResult<()> {
    controller.start_landscape_axis(map);

    map.handle_input(ScreenSpaceEventType::LeftClick, ScreenInput::click(start));
    let mut last = start;
    for &next in moves {
        map.handle_input(
            ScreenSpaceEventType::MouseMove,
            ScreenInput::motion(last, next),
        );
        last = next;
    }
    map.handle_input(ScreenSpaceEventType::LeftClick, ScreenInput::click(end));

    let handled = controller.pump(map)?;
    info!(handled, state = ?controller.axis_state(), "pointer input applied");

    let session = controller.session();
    println!("start: {}", describe(session.start));
    println!("end:   {}", describe(session.end));
    if session.end.is_none() {
        return Err("both clicks must land on the globe".into());
    }

    settle(map);
    print_camera(map);
    Ok(())
}

fn settle(map: &mut MapService) {
    for _ in 0..MAX_FRAMES {
        if !map.viewer().camera().is_flying() {
            break;
        }
        map.tick(FRAME_S);
    }
}

fn print_result(index: usize, result: &AutoPostingResult) {
    let buildings = result
        .buildings()
        .map(|b| b.len().to_string())
        .unwrap_or_else(|e| format!("invalid ({e})"));
    println!(
        "[{index}] id={} group={} name={:?} buildings={buildings}",
        result.id, result.group_id, result.info_name
    );
}

fn print_camera(map: &MapService) {
    let camera = map.viewer().camera();
    println!("camera: {}", describe(Some(camera.position())));
    println!(
        "  heading={:.2} pitch={:.2} roll={:.2} (deg)",
        camera.heading().to_degrees(),
        camera.pitch().to_degrees(),
        camera.roll().to_degrees(),
    );
}

fn describe(position: Option<Ecef>) -> String {
    match from_cartesian_to_geographic(position) {
        Some(geo) => format!(
            "lon={:.6} lat={:.6} alt={:.1}",
            geo.lon_deg,
            geo.lat_deg,
            geo.alt_m.unwrap_or(0.0)
        ),
        None => "-".to_string(),
    }
}

fn parse_pixel(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got {s:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(Vec2::new(x, y))
}
