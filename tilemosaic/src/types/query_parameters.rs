//! Filters of a mosaic query.
//!
//! A spatial filter is given in WGS 84 degrees. Regions crossing the antimeridian may be
//! written either as a multi-polygon of the two halves or as one box running past ±180°;
//! both are split into boxes inside `[-180, 180]` before the query runs.

use geo::{Coord, Geometry, MultiPolygon, Polygon, Rect};
use std::collections::BTreeSet;
use tilemosaic_core::Envelope;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParameters {
	pub spatial_filter: Option<Geometry<f64>>,
	/// Lower bound on frame resolution, in metres per pixel.
	pub min_gsd: Option<f64>,
	/// Upper bound on frame resolution, in metres per pixel.
	pub max_gsd: Option<f64>,
	pub srid: Option<i32>,
	pub types: Option<BTreeSet<String>>,
	pub precision_imagery: Option<bool>,
}

impl QueryParameters {
	pub fn with_spatial_filter(mut self, geometry: impl Into<Geometry<f64>>) -> Self {
		self.spatial_filter = Some(geometry.into());
		self
	}

	/// Filters on a longitude/latitude box. `west > east` denotes a box crossing the
	/// antimeridian and yields a filter of two polygons.
	pub fn with_region(self, west: f64, south: f64, east: f64, north: f64) -> Self {
		let rect = |w: f64, e: f64| -> Polygon<f64> {
			Rect::new(Coord { x: w, y: south }, Coord { x: e, y: north }).to_polygon()
		};
		if west > east {
			self.with_spatial_filter(MultiPolygon::new(vec![rect(west, 180.0), rect(-180.0, east)]))
		} else {
			self.with_spatial_filter(rect(west, east))
		}
	}

	pub fn with_min_gsd(mut self, min_gsd: f64) -> Self {
		self.min_gsd = Some(min_gsd);
		self
	}

	pub fn with_max_gsd(mut self, max_gsd: f64) -> Self {
		self.max_gsd = Some(max_gsd);
		self
	}

	pub fn with_srid(mut self, srid: i32) -> Self {
		self.srid = Some(srid);
		self
	}

	pub fn with_types<I, S>(mut self, types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.types = Some(types.into_iter().map(Into::into).collect());
		self
	}

	pub fn with_precision_imagery(mut self, precision_imagery: bool) -> Self {
		self.precision_imagery = Some(precision_imagery);
		self
	}

	/// The spatial filter as boxes within `[-180, 180]` longitude, or `None` when the
	/// query is not spatially restricted.
	///
	/// An empty geometry yields no boxes, i.e. a query matching nothing.
	pub fn spatial_envelopes(&self) -> Option<Vec<Envelope>> {
		let geometry = self.spatial_filter.as_ref()?;

		let parts: Vec<Envelope> = match geometry {
			Geometry::MultiPolygon(multi) => multi
				.iter()
				.filter_map(|polygon| Envelope::of_geometry(&Geometry::Polygon(polygon.clone())))
				.collect(),
			Geometry::GeometryCollection(collection) => collection.iter().filter_map(Envelope::of_geometry).collect(),
			other => Envelope::of_geometry(other).into_iter().collect(),
		};

		Some(parts.iter().flat_map(split_antimeridian).collect())
	}
}

/// Splits a longitude/latitude box running past ±180° into the parts on either side.
pub fn split_antimeridian(envelope: &Envelope) -> Vec<Envelope> {
	let Envelope {
		min_x,
		min_y,
		max_x,
		max_y,
	} = *envelope;

	let part = |min_x: f64, max_x: f64| Envelope {
		min_x,
		min_y,
		max_x,
		max_y,
	};

	if max_x - min_x >= 360.0 {
		vec![part(-180.0, 180.0)]
	} else if max_x > 180.0 {
		vec![part(min_x.max(-180.0), 180.0), part(-180.0, max_x - 360.0)]
	} else if min_x < -180.0 {
		vec![part(min_x + 360.0, 180.0), part(-180.0, max_x.min(180.0))]
	} else {
		vec![*envelope]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use geo::{GeometryCollection, Point};
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn tuples(envelopes: Option<Vec<Envelope>>) -> Option<Vec<(f64, f64, f64, f64)>> {
		envelopes.map(|list| list.iter().map(Envelope::as_tuple).collect())
	}

	#[test]
	fn no_filter() {
		assert_eq!(QueryParameters::default().spatial_envelopes(), None);
	}

	#[rstest]
	#[case((10.0, -5.0, 20.0, 5.0), vec![(10.0, -5.0, 20.0, 5.0)])]
	#[case((170.0, -5.0, 190.0, 5.0), vec![(170.0, -5.0, 180.0, 5.0), (-180.0, -5.0, -170.0, 5.0)])]
	#[case((-190.0, -5.0, -175.0, 5.0), vec![(170.0, -5.0, 180.0, 5.0), (-180.0, -5.0, -175.0, 5.0)])]
	#[case((-200.0, -5.0, 200.0, 5.0), vec![(-180.0, -5.0, 180.0, 5.0)])]
	fn splits_boxes(#[case] input: (f64, f64, f64, f64), #[case] expected: Vec<(f64, f64, f64, f64)>) {
		let envelope = Envelope::new(input.0, input.1, input.2, input.3).unwrap();
		let params = QueryParameters::default().with_spatial_filter(envelope.to_polygon());
		assert_eq!(tuples(params.spatial_envelopes()), Some(expected));
	}

	#[test]
	fn region_across_antimeridian() {
		let params = QueryParameters::default().with_region(170.0, -10.0, -170.0, 10.0);
		assert!(matches!(params.spatial_filter, Some(Geometry::MultiPolygon(_))));
		assert_eq!(
			tuples(params.spatial_envelopes()),
			Some(vec![(170.0, -10.0, 180.0, 10.0), (-180.0, -10.0, -170.0, 10.0)])
		);

		let params = QueryParameters::default().with_region(-10.0, -10.0, 10.0, 10.0);
		assert!(matches!(params.spatial_filter, Some(Geometry::Polygon(_))));
		assert_eq!(tuples(params.spatial_envelopes()), Some(vec![(-10.0, -10.0, 10.0, 10.0)]));
	}

	#[test]
	fn collections_and_empty_geometries() {
		let collection = GeometryCollection::new_from(vec![
			Geometry::Point(Point::new(1.0, 2.0)),
			Geometry::Point(Point::new(3.0, 4.0)),
		]);
		let params = QueryParameters::default().with_spatial_filter(Geometry::GeometryCollection(collection));
		assert_eq!(
			tuples(params.spatial_envelopes()),
			Some(vec![(1.0, 2.0, 1.0, 2.0), (3.0, 4.0, 3.0, 4.0)])
		);

		let params = QueryParameters::default().with_spatial_filter(MultiPolygon::<f64>::new(vec![]));
		assert_eq!(tuples(params.spatial_envelopes()), Some(vec![]));
	}

	#[test]
	fn builders() {
		let params = QueryParameters::default()
			.with_min_gsd(1.0)
			.with_max_gsd(2.0)
			.with_srid(3857)
			.with_types(["customtiles"])
			.with_precision_imagery(false);
		assert_eq!(params.min_gsd, Some(1.0));
		assert_eq!(params.max_gsd, Some(2.0));
		assert_eq!(params.srid, Some(3857));
		assert_eq!(params.types, Some(BTreeSet::from(["customtiles".to_string()])));
		assert_eq!(params.precision_imagery, Some(false));
	}
}
