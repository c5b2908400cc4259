use datatest_stable::Utf8Path;

/// Every `(` has a matching `)` and nesting never goes negative.
fn balanced(wkt: &str) -> bool {
    let mut depth: i64 = 0;
    for c in wkt.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// `LINESTRING(x y,x y)` with two numeric pairs.
fn is_label_path(path: &str) -> bool {
    let Some(inner) = path
        .strip_prefix("LINESTRING(")
        .and_then(|s| s.strip_suffix(')'))
    else {
        return false;
    };
    let pairs: Vec<&str> = inner.split(',').collect();
    pairs.len() == 2
        && pairs.iter().all(|pair| {
            let coords: Vec<&str> = pair.split(' ').collect();
            coords.len() == 2 && coords.iter().all(|c| c.parse::<f64>().is_ok())
        })
}

fn test_svg_file(path: &Utf8Path) -> datatest_stable::Result<()> {
    let source = std::fs::read_to_string(path)?;
    let out = svg2wkt::convert(&source)?;

    if !out.detail.starts_with("GEOMETRYCOLLECTION") {
        return Err(format!("{}: detail is not a collection: {}", path, out.detail).into());
    }
    if !balanced(&out.detail) {
        return Err(format!("{}: unbalanced detail: {}", path, out.detail).into());
    }
    for space in &out.spaces {
        if space.id.is_empty() || space.space.is_empty() || !balanced(&space.space) {
            return Err(format!("{}: bad space {:?}", path, space).into());
        }
    }
    for label in &out.strings {
        if label.text.trim().is_empty() || label.text != label.text.trim() {
            return Err(format!("{}: label text not trimmed: {:?}", path, label.text).into());
        }
        if !is_label_path(&label.path) {
            return Err(format!("{}: bad label path {}", path, label.path).into());
        }
    }

    // Fixtures with a `.wkt` sibling pin the exact collection text
    let expected_path = path.with_extension("wkt");
    if expected_path.exists() {
        let expected = std::fs::read_to_string(&expected_path)?;
        if out.detail != expected.trim_end() {
            return Err(format!(
                "{}: detail mismatch\nexpected: {}\n     got: {}",
                path,
                expected.trim_end(),
                out.detail
            )
            .into());
        }
    }

    Ok(())
}

datatest_stable::harness! {
    { test = test_svg_file, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"), pattern = r"\.svg$" },
}
