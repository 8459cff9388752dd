use clap::{App, Arg, SubCommand};
use std::fs;
use std::path::PathBuf;

//===========================================================================//

fn main() {
    let matches = App::new("icopack-tool")
        .version("0.1")
        .about("Packs PNG images into ICO files")
        .subcommand(
            SubCommand::with_name("create")
                .about("Creates an ICO file from PNG files")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("PATH")
                        .short("o")
                        .long("output")
                        .help("Sets output path"),
                )
                .arg(
                    Arg::with_name("profile")
                        .takes_value(true)
                        .value_name("NAME")
                        .long("profile")
                        .possible_values(&["application", "generic"])
                        .help(
                            "Renders a single input PNG at every size in \
                             the named profile",
                        ),
                )
                .arg(Arg::with_name("image").multiple(true)),
        )
        .subcommand(
            SubCommand::with_name("extract")
                .about("Extracts an image from an ICO file as a PNG")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("PATH")
                        .short("o")
                        .long("output")
                        .help("Sets output path"),
                )
                .arg(Arg::with_name("ico").required(true))
                .arg(Arg::with_name("index").required(true)),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("Lists images in an ICO file")
                .arg(Arg::with_name("ico").required(true)),
        )
        .get_matches();
    if let Some(submatches) = matches.subcommand_matches("create") {
        let out_path = if let Some(path) = submatches.value_of("output") {
            PathBuf::from(path)
        } else {
            let mut path = PathBuf::from("out.ico");
            let mut index: i32 = 0;
            while path.exists() {
                index += 1;
                path = PathBuf::from(format!("out{}.ico", index));
            }
            path
        };
        let mut images = Vec::<icopack::IconImage>::new();
        if let Some(paths) = submatches.values_of("image") {
            for path in paths {
                println!("Adding {:?}", path);
                let file = fs::File::open(path).unwrap();
                images.push(icopack::IconImage::read_png(file).unwrap());
            }
        }
        if let Some(profile) = submatches.value_of("profile") {
            let profile = match profile {
                "generic" => icopack::SizeProfile::Generic,
                _ => icopack::SizeProfile::Application,
            };
            assert_eq!(images.len(), 1, "--profile takes exactly one image");
            let image = images.pop().unwrap();
            icopack::save_file(image, profile, out_path).unwrap();
        } else {
            let mut out_file = fs::File::create(out_path).unwrap();
            icopack::save_images(images, &mut out_file).unwrap();
        }
    } else if let Some(submatches) = matches.subcommand_matches("extract") {
        let path = submatches.value_of("ico").unwrap();
        let file = fs::File::open(path).unwrap();
        let icondir = icopack::IconDir::read(file).unwrap();
        let index = submatches.value_of("index").unwrap();
        let index = index.parse::<usize>().unwrap();
        let image = icondir.entries()[index].decode().unwrap();
        let out_path = if let Some(path) = submatches.value_of("output") {
            PathBuf::from(path)
        } else {
            PathBuf::from(format!("{}.{}.png", path, index))
        };
        let out_file = fs::File::create(out_path).unwrap();
        image.write_png(out_file).unwrap();
    } else if let Some(submatches) = matches.subcommand_matches("list") {
        let path = submatches.value_of("ico").unwrap();
        let file = fs::File::open(path).unwrap();
        let icondir = icopack::IconDir::read(file).unwrap();
        for (index, entry) in icondir.entries().iter().enumerate() {
            let kind = if entry.is_png() { "PNG" } else { "BMP" };
            println!(
                "{:5}: {}x{} {}, {} bpp",
                index,
                entry.width(),
                entry.height(),
                kind,
                entry.bits_per_pixel()
            );
        }
    }
}

//===========================================================================//
