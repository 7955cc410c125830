use plotters::prelude::*;
use tracing::debug;
use uuid::Uuid;

use crate::models::DisplayPoint;

/// Split points into runs of consecutive non-null values. A null value
/// breaks the line, like a missing reading on the dashboard chart.
pub fn line_segments(points: &[DisplayPoint]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for (i, point) in points.iter().enumerate() {
        match point.value {
            Some(value) => current.push((i as f64, value)),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Y axis range padded by 10% of the value span
pub fn value_bounds(points: &[DisplayPoint]) -> Option<(f64, f64)> {
    let mut values = points.iter().filter_map(|p| p.value);
    let first = values.next()?;
    let (min_value, max_value) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let span = max_value - min_value;
    // Flat series still need a visible band
    let padding = if span < 1e-8 {
        (max_value.abs() * 0.1).max(1.0)
    } else {
        span * 0.1
    };
    Some((min_value - padding, max_value + padding))
}

/// Label for an x axis position, snapped to the nearest point
fn label_at(points: &[DisplayPoint], x: f64) -> String {
    if points.is_empty() || x < -0.5 {
        return String::new();
    }
    let idx = x.round() as usize;
    points.get(idx).map(|p| p.label.clone()).unwrap_or_default()
}

/// Generate a series chart image as PNG bytes.
///
/// Points are plotted by position, labelled with their display label. Points
/// flagged with `show_imputed_marker` get a hollow red marker.
pub fn generate_series_chart(
    points: &[DisplayPoint],
    caption: &str,
    y_desc: &str,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    let (y_min, y_max) = value_bounds(points)
        .ok_or("❌ No readings to plot in this range (every value is empty).".to_string())?;

    let x_max = (points.len().saturating_sub(1)).max(1) as f64;
    let segments = line_segments(points);
    let markers: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.show_imputed_marker)
        .filter_map(|(i, p)| p.value.map(|v| (i as f64, v)))
        .collect();

    debug!(
        "Rendering chart: {} points, {} segments, {} imputed markers",
        points.len(),
        segments.len(),
        markers.len()
    );

    let temp_file = std::env::temp_dir().join(format!("fitdash_chart_{}.png", Uuid::new_v4()));

    {
        let backend = BitMapBackend::new(&temp_file, (width, height));
        let root = backend.into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| format!("Failed to fill canvas: {}", e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 28.0).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5..x_max + 0.5, y_min..y_max)
            .map_err(|e| format!("Failed to build chart: {}", e))?;

        let x_formatter = |x: &f64| label_at(points, *x);
        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&x_formatter)
            .y_desc(y_desc)
            .x_desc("Time")
            .draw()
            .map_err(|e| format!("Failed to draw mesh: {}", e))?;

        for segment in segments {
            if segment.len() == 1 {
                // Isolated reading between gaps
                chart
                    .draw_series(segment.into_iter().map(|p| Circle::new(p, 2, BLUE.filled())))
                    .map_err(|e| format!("Failed to draw point: {}", e))?;
            } else {
                chart
                    .draw_series(LineSeries::new(segment, &BLUE))
                    .map_err(|e| format!("Failed to draw line: {}", e))?;
            }
        }

        if !markers.is_empty() {
            chart
                .draw_series(markers.into_iter().map(|p| Circle::new(p, 5, RED.stroke_width(2))))
                .map_err(|e| format!("Failed to draw imputed markers: {}", e))?
                .label("imputed")
                .legend(|(x, y)| Circle::new((x, y), 5, RED.stroke_width(2)));

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(|e| format!("Failed to draw legend: {}", e))?;
        }

        root.present()
            .map_err(|e| format!("Failed to render chart: {}", e))?;
    }

    // Read the temporary file into memory
    let image_data = std::fs::read(&temp_file)
        .map_err(|e| format!("Failed to read chart file: {}", e))?;

    // Clean up temporary file
    let _ = std::fs::remove_file(&temp_file);

    Ok(image_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(value: Option<f64>, marker: bool) -> DisplayPoint {
        DisplayPoint {
            timestamp_iso: "2024-01-01T00:00:00".to_string(),
            label: "01-01 00:00".to_string(),
            value,
            is_imputed: marker,
            show_imputed_marker: marker,
        }
    }

    #[test]
    fn test_nulls_break_segments() {
        let points = vec![
            point(Some(1.0), false),
            point(Some(2.0), false),
            point(None, false),
            point(Some(3.0), false),
            point(None, false),
            point(None, false),
            point(Some(4.0), true),
            point(Some(5.0), true),
        ];
        let segments = line_segments(&points);
        assert_eq!(
            segments,
            vec![
                vec![(0.0, 1.0), (1.0, 2.0)],
                vec![(3.0, 3.0)],
                vec![(6.0, 4.0), (7.0, 5.0)],
            ]
        );
    }

    #[test]
    fn test_value_bounds_padding() {
        let points = vec![point(Some(50.0), false), point(None, false), point(Some(150.0), false)];
        assert_eq!(value_bounds(&points), Some((40.0, 160.0)));
    }

    #[test]
    fn test_value_bounds_flat_series() {
        let points = vec![point(Some(98.0), false), point(Some(98.0), false)];
        let (lo, hi) = value_bounds(&points).unwrap();
        assert!(lo < 98.0 && hi > 98.0);
    }

    #[test]
    fn test_no_values_no_chart() {
        let points = vec![point(None, false), point(None, true)];
        assert_eq!(value_bounds(&points), None);
        let err = generate_series_chart(&points, "test", "bpm", 640, 480).unwrap_err();
        assert!(err.contains("No readings"));
    }

    #[test]
    fn test_label_snaps_to_nearest_point() {
        let mut points = vec![point(Some(1.0), false), point(Some(2.0), false)];
        points[1].label = "01-01 00:01".to_string();
        assert_eq!(label_at(&points, 0.2), "01-01 00:00");
        assert_eq!(label_at(&points, 0.8), "01-01 00:01");
        assert_eq!(label_at(&points, 5.0), "");
        assert_eq!(label_at(&points, -1.0), "");
    }
}
