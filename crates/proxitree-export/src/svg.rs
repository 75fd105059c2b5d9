//! SVG export serializer.
//!
//! Renders a [`Graph`] into an SVG string using the [`svg`] crate for
//! document construction and XML escaping.
//!
//! Every edge becomes a `<line>` and every point a `<circle>`.  Edges are
//! drawn first so points sit on top of them.  Graph coordinates are
//! mapped onto the canvas with the origin in the bottom-left corner.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::{Circle, Description, Element, Group, Line, Rectangle, Title};
use svg::node::{Node, Text};

use proxitree_graph::{Graph, Point};

/// Canvas size and drawing attributes.
///
/// The default matches the classic 800 x 800 rendering: 7.5 canvas units
/// per graph unit, 20 units of padding, blue edges and red points.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgStyle {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Canvas units per graph unit.
    pub scale: f64,
    /// Offset keeping points away from the left and bottom borders.
    pub padding: f64,
    /// Background fill.
    pub background: &'static str,
    /// Edge stroke colour.
    pub edge_color: &'static str,
    /// Edge stroke width.
    pub edge_width: f64,
    /// Point circle radius.
    pub point_radius: f64,
    /// Point fill colour.
    pub point_fill: &'static str,
    /// Point outline colour.
    pub point_stroke: &'static str,
    /// Point outline width.
    pub point_stroke_width: f64,
    /// Caption font size.
    pub caption_size: f64,
    /// Caption anchor, in canvas coordinates.
    pub caption_position: (f64, f64),
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            scale: 7.5,
            padding: 20.0,
            background: "white",
            edge_color: "blue",
            edge_width: 2.0,
            point_radius: 5.0,
            point_fill: "red",
            point_stroke: "black",
            point_stroke_width: 2.0,
            caption_size: 14.0,
            caption_position: (275.0, 15.0),
        }
    }
}

impl SvgStyle {
    /// Map a graph point to canvas coordinates (y axis flipped).
    ///
    /// # Examples
    ///
    /// ```
    /// use proxitree_export::SvgStyle;
    /// use proxitree_graph::Point;
    ///
    /// let style = SvgStyle::default();
    /// assert_eq!(style.project(Point::new(2, 4)), (35.0, 750.0));
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn project(&self, point: Point) -> (f64, f64) {
        let x = (point.x as f64).mul_add(self.scale, self.padding);
        let y = f64::from(self.height) - (point.y as f64).mul_add(self.scale, self.padding);
        (x, y)
    }
}

/// Metadata to embed in the SVG document.
///
/// All fields are optional.  `title` and `description` become the
/// standard `<title>` and `<desc>` accessibility elements; `caption` is
/// drawn as visible text on the canvas.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title -- emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description -- emitted as `<desc>`.
    ///
    /// Typically holds the graph configuration so exported files are
    /// distinguishable.
    pub description: Option<&'a str>,

    /// Visible caption, e.g. author and date.
    pub caption: Option<&'a str>,
}

/// Serialize a graph into an SVG document string.
///
/// # Examples
///
/// ```
/// use proxitree_export::{SvgMetadata, SvgStyle, to_svg};
/// use proxitree_graph::{build_graph, points_from_samples};
///
/// let graph = build_graph(&points_from_samples(&[1, 3]), 5.0);
/// let metadata = SvgMetadata {
///     title: Some("graph"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(&graph, &SvgStyle::default(), &metadata);
/// assert!(svg.contains("<title>graph</title>"));
/// assert_eq!(svg.matches("<circle").count(), 2);
/// assert_eq!(svg.matches("<line").count(), 2);
/// ```
#[must_use]
pub fn to_svg(graph: &Graph, style: &SvgStyle, metadata: &SvgMetadata<'_>) -> String {
    let (w, h) = (style.width, style.height);
    let mut doc = Document::new()
        .set("width", w)
        .set("height", h)
        .set("viewBox", (0, 0, w, h));

    // Optional <title> element
    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    // Optional <desc> element
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    doc = doc.add(
        Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", w)
            .set("height", h)
            .set("fill", style.background),
    );

    let mut edges = Group::new()
        .set("id", "edges")
        .set("stroke", style.edge_color)
        .set("stroke-width", style.edge_width)
        .set("fill", "none");
    for edge in graph.edges() {
        let (x1, y1) = style.project(edge.left());
        let (x2, y2) = style.project(edge.right());
        edges = edges.add(
            Line::new()
                .set("x1", x1)
                .set("y1", y1)
                .set("x2", x2)
                .set("y2", y2),
        );
    }
    doc = doc.add(edges);

    let mut points = Group::new()
        .set("id", "points")
        .set("fill", style.point_fill)
        .set("stroke", style.point_stroke)
        .set("stroke-width", style.point_stroke_width);
    for point in graph.points() {
        let (cx, cy) = style.project(point);
        points = points.add(
            Circle::new()
                .set("cx", cx)
                .set("cy", cy)
                .set("r", style.point_radius),
        );
    }
    doc = doc.add(points);

    if let Some(caption) = metadata.caption {
        let (x, y) = style.caption_position;
        let mut text = Element::new("text");
        text.assign("x", x);
        text.assign("y", y);
        text.assign("font-size", style.caption_size);
        text.append(Text::new(caption));
        doc = doc.add(text);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proxitree_graph::{Edge, build_graph, build_mst, points_from_samples};

    use super::*;

    /// Shorthand: no metadata (most tests don't care about it).
    fn no_meta() -> SvgMetadata<'static> {
        SvgMetadata::default()
    }

    fn connected_graph() -> Graph {
        build_graph(&points_from_samples(&[1, 3, 1, 4]), 10.0)
    }

    // --- project ---

    #[test]
    fn project_flips_y_axis() {
        let style = SvgStyle::default();
        assert_eq!(style.project(Point::new(1, 1)), (27.5, 772.5));
        assert_eq!(style.project(Point::new(0, 0)), (20.0, 780.0));
    }

    #[test]
    fn project_uses_custom_style() {
        let style = SvgStyle {
            height: 100,
            scale: 1.0,
            padding: 0.0,
            ..SvgStyle::default()
        };
        assert_eq!(style.project(Point::new(10, 30)), (10.0, 70.0));
    }

    // --- Document structure ---

    #[test]
    fn empty_graph_produces_valid_svg() {
        let svg = to_svg(&Graph::new(), &SvgStyle::default(), &no_meta());
        assert!(svg.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(svg.contains(r#"width="800""#));
        assert!(svg.contains(r#"height="800""#));
        assert!(svg.contains(r#"viewBox="0 0 800 800""#));
        assert!(svg.contains(r#"fill="white""#));
        assert!(!svg.contains("<line"));
        assert!(!svg.contains("<circle"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn one_line_per_edge_and_one_circle_per_point() {
        let graph = connected_graph();
        let svg = to_svg(&graph, &SvgStyle::default(), &no_meta());
        assert_eq!(svg.matches("<line").count(), graph.edge_count());
        assert_eq!(svg.matches("<circle").count(), graph.point_count());
    }

    #[test]
    fn mst_renders_fewer_lines() {
        let graph = connected_graph();
        let mst = build_mst(&graph).unwrap();
        let svg = to_svg(&mst, &SvgStyle::default(), &no_meta());
        assert_eq!(svg.matches("<line").count(), 3);
        assert_eq!(svg.matches("<circle").count(), 4);
    }

    #[test]
    fn edges_are_drawn_before_points() {
        let svg = to_svg(&connected_graph(), &SvgStyle::default(), &no_meta());
        let first_line = svg.find("<line").unwrap();
        let first_circle = svg.find("<circle").unwrap();
        assert!(first_line < first_circle);
    }

    #[test]
    fn line_coordinates_are_projected() {
        let mut graph = Graph::new();
        graph.add_edge(Edge::new(Point::new(1, 1), Point::new(2, 3)).unwrap());
        let svg = to_svg(&graph, &SvgStyle::default(), &no_meta());
        assert!(svg.contains(r#"x1="27.5""#));
        assert!(svg.contains(r#"y1="772.5""#));
        assert!(svg.contains(r#"x2="35""#));
        assert!(svg.contains(r#"y2="757.5""#));
        assert!(svg.contains(r#"stroke="blue""#));
    }

    #[test]
    fn circles_carry_point_style() {
        let mut graph = Graph::new();
        graph.add_point(Point::new(2, 4));
        let svg = to_svg(&graph, &SvgStyle::default(), &no_meta());
        assert!(svg.contains(r#"cx="35""#));
        assert!(svg.contains(r#"cy="750""#));
        assert!(svg.contains(r#"r="5""#));
        assert!(svg.contains(r#"fill="red""#));
        assert!(svg.contains(r#"stroke="black""#));
    }

    // --- Metadata ---

    #[test]
    fn no_metadata_omits_title_desc_and_caption() {
        let svg = to_svg(&connected_graph(), &SvgStyle::default(), &no_meta());
        assert!(!svg.contains("<title>"));
        assert!(!svg.contains("<desc>"));
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn title_and_description_are_emitted() {
        let metadata = SvgMetadata {
            title: Some("week1"),
            description: Some("radius=20"),
            ..SvgMetadata::default()
        };
        let svg = to_svg(&connected_graph(), &SvgStyle::default(), &metadata);
        assert!(svg.contains("<title>week1</title>"));
        assert!(svg.contains("<desc>"));
        assert!(svg.contains("radius=20"));
    }

    #[test]
    fn caption_is_drawn_as_text() {
        let metadata = SvgMetadata {
            caption: Some("created on 2024-02-25"),
            ..SvgMetadata::default()
        };
        let svg = to_svg(&connected_graph(), &SvgStyle::default(), &metadata);
        assert!(svg.contains("<text"));
        assert!(svg.contains("created on 2024-02-25"));
        assert!(svg.contains(r#"x="275""#));
        assert!(svg.contains(r#"font-size="14""#));
    }

    #[test]
    fn caption_is_xml_escaped() {
        let metadata = SvgMetadata {
            caption: Some("a < b & c"),
            ..SvgMetadata::default()
        };
        let svg = to_svg(&connected_graph(), &SvgStyle::default(), &metadata);
        assert!(svg.contains("a &lt; b &amp; c"));
    }
}
