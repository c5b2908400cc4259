use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let input = std::env::args()
        .nth(1)
        .map(|path| std::fs::read_to_string(&path).expect("Failed to read file"))
        .unwrap_or_else(|| {
            r#"<svg xmlns="http://www.w3.org/2000/svg">
  <rect id="room" title="Kitchen" x="0" y="0" width="40" height="30"/>
  <circle cx="60" cy="15" r="10"/>
  <path d="M0 40 L40 40 A10 10 0 0 1 60 40"/>
  <text x="5" y="20" font-size="12">Kitchen</text>
</svg>"#
                .to_string()
        });

    tracing::debug!(bytes = input.len(), "converting input");
    match svg2wkt::convert(&input) {
        Ok(out) => match serde_json::to_string_pretty(&out) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: {}", e),
        },
        Err(e) => eprintln!("{:?}", miette::Report::new(e)),
    }
}
