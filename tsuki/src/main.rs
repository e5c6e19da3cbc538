use std::{path::Path, sync::Arc};

use tsuki::{
    expect,
    renderer::render,
    scene::cornell_box,
    settings::InitialSettings,
    tsuki_info, tsuki_warn,
};

const SETTINGS_PATH: &str = "tsuki.yaml";
const OUTPUT_PATH: &str = "tsuki.png";

fn setup_logger() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}:{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        // .level(log::LevelFilter::Debug)
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout())
        .chain(std::fs::File::create("tsuki.log")?)
        .apply()?;
    Ok(())
}

fn main() {
    if let Err(why) = setup_logger() {
        panic!("{}", why);
    };

    let settings = if Path::new(SETTINGS_PATH).exists() {
        expect!(
            InitialSettings::load(Path::new(SETTINGS_PATH)),
            "Failed to load settings"
        )
    } else {
        tsuki_warn!("No {} found, using default settings", SETTINGS_PATH);
        InitialSettings::default()
    };

    let mut scene = expect!(cornell_box(), "Failed to build scene");
    scene.build_index(&settings.index);

    let (film, result) = expect!(
        render(Arc::new(scene), settings.film, settings.render),
        "Render failed"
    );
    tsuki_info!(
        "Rendered {} rays in {:.2}s",
        result.ray_count,
        result.secs
    );

    let res = film.res();
    let image = match image::RgbImage::from_raw(res.x as u32, res.y as u32, film.pixels().to_vec())
    {
        Some(image) => image,
        None => panic!("Film doesn't match its resolution"),
    };
    expect!(image.save(OUTPUT_PATH), "Failed to write image");
    tsuki_info!("Wrote {}", OUTPUT_PATH);
}
