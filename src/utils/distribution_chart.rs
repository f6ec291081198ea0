use plotters::prelude::*;
use std::error::Error;

use crate::models::{ItemCount, ZoneId};

/// Draws a bar chart of items per zone for one combination into a PNG
pub fn draw_zone_distribution(
    output_path: &str,
    distribution: &[(ZoneId, ItemCount)],
    chart_title: &str,
) -> Result<(), Box<dyn Error>> {
    if distribution.is_empty() {
        return Err("no zones to draw".into());
    }

    let max_items = distribution
        .iter()
        .map(|(_, items)| *items)
        .max()
        .unwrap_or(0)
        .max(1);
    // Add padding above the tallest bar
    let y_top = max_items + max_items / 10 + 1;
    let zone_count = distribution.len() as u32;
    let labels: Vec<String> = distribution.iter().map(|(zone, _)| zone.to_string()).collect();

    let root = BitMapBackend::new(output_path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Items per Zone - {}", chart_title),
            ("sans-serif", 20).into_font(),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..zone_count).into_segmented(), 0u64..y_top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Zone")
        .y_desc("Items")
        .x_label_formatter(&|segment: &SegmentValue<u32>| match segment {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i as usize).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.6).filled())
            .margin(4)
            .data(
                distribution
                    .iter()
                    .enumerate()
                    .map(|(i, (_, items))| (i as u32, *items)),
            ),
    )?;

    root.present()?;
    Ok(())
}
