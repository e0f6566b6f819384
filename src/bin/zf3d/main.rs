//! ZF3D CLI - Tool for inspecting and re-writing ZF3D containers.

use std::env;
use std::path::Path;

use tracing_subscriber::EnvFilter;
use zf3d::container::{read_container, write_container_to, ContainerRead, WriteOptions};
use zf3d::scene::{NodeKind, SceneModel, SceneNode};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_DATE: &str = env!("ZF3D_BUILD_DATE");
const BUILD_TIME: &str = env!("ZF3D_BUILD_TIME");

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "off",
            _ => filtered_args.push(arg),
        }
    }

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    // JSON output goes to stdout; keep diagnostics off it
    if filtered_args.iter().any(|&s| s == "--json" || s == "-j") {
        level = "off";
    }
    init_logging(level);

    match filtered_args[0] {
        // Info command - show container summary
        "info" | "i" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: zf3d-cli info <file.zf3d>");
                std::process::exit(1);
            }
            cmd_info(filtered_args[1]);
        }

        // Tree command - show nodes and what they draw
        "tree" | "t" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: zf3d-cli tree <file.zf3d>");
                std::process::exit(1);
            }
            cmd_tree(filtered_args[1]);
        }

        // Dump command - surfaces and vertices
        "dump" | "d" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: zf3d-cli dump <file.zf3d> [surface] [--json]");
                std::process::exit(1);
            }
            let json_mode = filtered_args.iter().any(|&s| s == "--json" || s == "-j");
            let pattern = filtered_args.get(2).filter(|&&s| s != "--json" && s != "-j").copied();
            cmd_dump(filtered_args[1], pattern, json_mode);
        }

        // Copy command - read and write back
        "copy" | "c" => {
            if filtered_args.len() < 3 {
                eprintln!("Error: missing arguments");
                eprintln!("Usage: zf3d-cli copy <input.zf3d> <output.zf3d> [--level N]");
                std::process::exit(1);
            }
            let compression_level = match parse_level(&filtered_args[3..]) {
                Ok(level) => level,
                Err(msg) => {
                    eprintln!("Error: {}", msg);
                    std::process::exit(1);
                }
            };
            cmd_copy(filtered_args[1], filtered_args[2], WriteOptions { compression_level });
        }

        "version" | "-V" | "--version" => {
            println!("zf3d-cli {} (built {} {})", VERSION, BUILD_DATE, BUILD_TIME);
        }

        // Help
        "help" | "h" | "-h" | "--help" => print_help(),

        // Default: if file exists, show info; otherwise error
        _ => {
            if Path::new(filtered_args[0]).exists() {
                cmd_info(filtered_args[0]);
            } else {
                eprintln!("Unknown command: {}", filtered_args[0]);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("zf3d={level},zf3d_cli={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_help() {
    println!("zf3d-cli - ZF3D container toolkit");
    println!();
    println!("USAGE:");
    println!("    zf3d-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info   <file>              Show container summary and surface status");
    println!("    t, tree   <file>              Show nodes with their surfaces and materials");
    println!("    d, dump   <file> [surface]    Dump surface layouts and vertices");
    println!("    c, copy   <in> <out>          Read and re-write a container");
    println!("    version                       Show version and build date");
    println!("    h, help                       Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Suppress all output");
    println!("    -j, --json       (dump) Print the model as JSON");
    println!("    --level N        (copy) Compression level 0-9 (0 = stored)");
    println!();
    println!("EXAMPLES:");
    println!("    zf3d-cli info model.zf3d              # Quick overview");
    println!("    zf3d-cli tree model.zf3d              # See nodes");
    println!("    zf3d-cli dump model.zf3d body         # Dump surfaces matching 'body'");
    println!("    zf3d-cli dump model.zf3d --json       # Export the model as JSON");
    println!("    zf3d-cli copy in.zf3d out.zf3d        # Test round-trip");
    println!();
    println!("NOTES:");
    println!("    - Passing a file directly is equivalent to 'info'");
    println!("    - RUST_LOG overrides -v/-vv/-q");
}

fn parse_level(args: &[&str]) -> Result<i32, String> {
    match args {
        [] => Ok(WriteOptions::default().compression_level),
        ["--level", n] => n
            .parse::<i32>()
            .ok()
            .filter(|l| (0..=9).contains(l))
            .ok_or_else(|| format!("invalid compression level '{}'", n)),
        _ => Err(format!("unexpected arguments: {}", args.join(" "))),
    }
}

fn open(path: &str) -> ContainerRead {
    tracing::info!("Opening container: {}", path);
    match read_container(path) {
        Ok(read) => read,
        Err(e) => {
            eprintln!("Failed to open {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn cmd_info(path: &str) {
    let read = open(path);
    let model = &read.model;

    println!("Container: {}", path);
    println!();
    println!("Surfaces:  {}", model.surfaces.len());
    println!("Maps:      {}", model.maps.len());
    println!("Materials: {}", model.materials.len());
    println!(
        "Nodes:     {} ({} meshes, {} cameras)",
        model.nodes.len(),
        count_nodes(model, |n| n.kind.as_mesh().is_some()),
        count_nodes(model, |n| n.kind.as_camera().is_some()),
    );
    println!("Vertices:  {}", model.total_vertices());
    println!();

    for report in &read.surfaces {
        match &report.outcome {
            Ok(count) => println!("  [{}] {} ({}): {} vertices", report.index, report.id, report.entry, count),
            Err(e) => println!("  [{}] {} ({}): FAILED - {}", report.index, report.id, report.entry, e),
        }
    }

    if !read.is_complete() {
        println!();
        println!("{} surface(s) failed to decode", read.failures().count());
    }
}

fn count_nodes(model: &SceneModel, pred: impl Fn(&SceneNode) -> bool) -> usize {
    model.nodes.iter().filter(|n| pred(n)).count()
}

fn cmd_tree(path: &str) {
    let read = open(path);
    let model = &read.model;

    println!("Container: {}", path);
    println!();

    for node in &model.nodes {
        println!("{} [{}] {}", node.id, node.kind.tag(), node.name);
        match &node.kind {
            NodeKind::Mesh(mesh) => {
                for id in &mesh.surfaces {
                    let vertices = model
                        .buffer(id)
                        .map(|b| b.vertex_count().to_string())
                        .unwrap_or_else(|| "-".into());
                    println!("  surface {} ({} vertices)", id, vertices);
                }
                for id in &mesh.materials {
                    let name = model.material(id).map(|m| m.name.as_str()).unwrap_or("?");
                    println!("  material {} ({})", id, name);
                }
            }
            NodeKind::Camera(camera) => {
                if let Some(fov) = camera.fov {
                    println!("  fov {}", fov);
                }
                if camera.active {
                    println!("  active");
                }
            }
            NodeKind::Other(_) => {}
        }
    }
}

fn cmd_dump(path: &str, pattern: Option<&str>, json_mode: bool) {
    let read = open(path);
    let model = &read.model;

    if json_mode {
        match dump_json(path, &read) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Failed to serialize {}: {}", path, e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Container: {}", path);
    println!("Surface Dump{}", pattern.map(|p| format!(" (filter: {})", p)).unwrap_or_default());
    println!();

    for surface in &model.surfaces {
        if pattern.is_some_and(|p| !surface.id.contains(p)) {
            continue;
        }
        println!("[SURFACE] {}", surface.id);
        println!("  inputs:  {}", surface.inputs.join(","));
        println!("  formats: {}", surface.formats.join(","));
        if let Some(size) = surface.size_per_vertex {
            println!("  sizePerVertex: {}", size);
        }
        let Some(buffer) = model.buffer(&surface.id) else {
            println!("  (not decoded)");
            println!();
            continue;
        };
        for index in 0..buffer.vertex_count() {
            let values: Vec<String> = buffer
                .channels()
                .filter_map(|(attribute, data)| {
                    data.components(index)
                        .map(|c| format!("{}={:?}", attribute, c))
                })
                .collect();
            println!("  [{}] {}", index, values.join(" "));
        }
        println!();
    }
}

/// Model plus per-surface outcomes as pretty JSON.
fn dump_json(path: &str, read: &ContainerRead) -> serde_json::Result<String> {
    let surfaces: Vec<_> = read
        .surfaces
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id,
                "entry": r.entry,
                "vertices": r.outcome.as_ref().ok(),
                "error": r.outcome.as_ref().err().map(ToString::to_string),
            })
        })
        .collect();
    let model = serde_json::to_value(&read.model)?;
    serde_json::to_string_pretty(&serde_json::json!({
        "container": path,
        "model": model,
        "surfaces": surfaces,
    }))
}

fn cmd_copy(input: &str, output: &str, opts: WriteOptions) {
    tracing::info!("Copying {} -> {}", input, output);

    let model = match open(input).into_complete() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = write_container_to(output, &model, &opts) {
        eprintln!("Failed to write {}: {}", output, e);
        std::process::exit(1);
    }

    println!("Copied {} -> {} ({} surfaces)", input, output, model.surfaces.len());
}
