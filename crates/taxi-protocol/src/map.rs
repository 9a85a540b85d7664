//! Full world snapshot: locations, customers and taxis.
//!
//! Each sequence is a `u32` element count followed by fixed-size elements,
//! and the three sequences are written back to back:
//!
//! ```text
//! location  id(1) x(4) y(4)                                           =  9
//! customer  id(1) x(4) y(4) destination(1) onboard(1) in_queue(1)
//!           next_request(4)                                           = 16
//! taxi      id(2) x(4) y(4) dest_x(4) dest_y(4) customer(1)
//!           connected(1) ready(1) stopped(1) wait_time(4)             = 26
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolResult;
use crate::types::{Customer, Identifier, Location, Taxi};
use crate::wire::{Reader, Writer};

const LOCATION_SIZE: usize = 9;
const CUSTOMER_SIZE: usize = 16;
const TAXI_SIZE: usize = 26;

/// One consistent snapshot of the simulated world.
///
/// Sequence order is part of the record and survives encoding unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Map {
    locations: Vec<Location>,
    customers: Vec<Customer>,
    taxis: Vec<Taxi>,
}

/// A key that does not resolve against its owning sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DanglingReference {
    /// `Customer.destination` names no location.
    CustomerDestination {
        customer: Identifier,
        location: Identifier,
    },
    /// `Taxi.customer` names no customer.
    TaxiCustomer { taxi: i16, customer: Identifier },
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CustomerDestination { customer, location } => {
                write!(f, "customer {customer} heads to unknown location {location}")
            }
            Self::TaxiCustomer { taxi, customer } => {
                write!(f, "taxi {taxi} carries unknown customer {customer}")
            }
        }
    }
}

impl Map {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map from its three sequences.
    pub fn from_parts(locations: Vec<Location>, customers: Vec<Customer>, taxis: Vec<Taxi>) -> Self {
        Self {
            locations,
            customers,
            taxis,
        }
    }

    /// Builder: append a location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    /// Builder: append a customer.
    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customers.push(customer);
        self
    }

    /// Builder: append a taxi.
    pub fn with_taxi(mut self, taxi: Taxi) -> Self {
        self.taxis.push(taxi);
        self
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn taxis(&self) -> &[Taxi] {
        &self.taxis
    }

    /// Splits the map back into its sequences.
    pub fn into_parts(self) -> (Vec<Location>, Vec<Customer>, Vec<Taxi>) {
        (self.locations, self.customers, self.taxis)
    }

    /// Finds a location by id.
    pub fn location(&self, id: Identifier) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// Finds a customer by id.
    pub fn customer(&self, id: Identifier) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Finds a taxi by id.
    pub fn taxi(&self, id: i16) -> Option<&Taxi> {
        self.taxis.iter().find(|t| t.id == id)
    }

    /// Lists every `destination` and taxi `customer` key that does not
    /// resolve. The codec never checks this itself.
    pub fn validate_references(&self) -> Vec<DanglingReference> {
        let destinations = self.customers.iter().filter_map(|c| {
            self.location(c.destination)
                .is_none()
                .then_some(DanglingReference::CustomerDestination {
                    customer: c.id,
                    location: c.destination,
                })
        });
        let passengers = self.taxis.iter().filter_map(|t| {
            let customer = t.customer?;
            self.customer(customer)
                .is_none()
                .then_some(DanglingReference::TaxiCustomer {
                    taxi: t.id,
                    customer,
                })
        });
        destinations.chain(passengers).collect()
    }

    /// Encodes the record.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = Writer::with_capacity(
            12 + self.locations.len() * LOCATION_SIZE
                + self.customers.len() * CUSTOMER_SIZE
                + self.taxis.len() * TAXI_SIZE,
        );

        w.put_len(self.locations.len());
        for location in &self.locations {
            encode_location(&mut w, location);
        }

        w.put_len(self.customers.len());
        for customer in &self.customers {
            encode_customer(&mut w, customer);
        }

        w.put_len(self.taxis.len());
        for taxi in &self.taxis {
            encode_taxi(&mut w, taxi);
        }

        w.finish()
    }

    /// Decodes a record occupying the whole buffer.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        let mut r = Reader::new(bytes);

        let count = r.count("map.locations", LOCATION_SIZE)?;
        let locations = (0..count)
            .map(|_| decode_location(&mut r))
            .collect::<ProtocolResult<Vec<_>>>()?;

        let count = r.count("map.customers", CUSTOMER_SIZE)?;
        let customers = (0..count)
            .map(|_| decode_customer(&mut r))
            .collect::<ProtocolResult<Vec<_>>>()?;

        let count = r.count("map.taxis", TAXI_SIZE)?;
        let taxis = (0..count)
            .map(|_| decode_taxi(&mut r))
            .collect::<ProtocolResult<Vec<_>>>()?;

        r.finish("map")?;
        Ok(Self::from_parts(locations, customers, taxis))
    }
}

fn encode_location(w: &mut Writer, location: &Location) {
    w.put_id(location.id);
    w.put_coord(location.coord);
}

fn decode_location(r: &mut Reader<'_>) -> ProtocolResult<Location> {
    Ok(Location {
        id: r.id("location.id")?,
        coord: r.coord("location.coord")?,
    })
}

fn encode_customer(w: &mut Writer, customer: &Customer) {
    w.put_id(customer.id);
    w.put_coord(customer.coord);
    w.put_id(customer.destination);
    w.put_bool(customer.onboard);
    w.put_bool(customer.in_queue);
    w.put_i32(customer.next_request);
}

fn decode_customer(r: &mut Reader<'_>) -> ProtocolResult<Customer> {
    Ok(Customer {
        id: r.id("customer.id")?,
        coord: r.coord("customer.coord")?,
        destination: r.id("customer.destination")?,
        onboard: r.bool("customer.onboard")?,
        in_queue: r.bool("customer.in_queue")?,
        next_request: r.i32("customer.next_request")?,
    })
}

fn encode_taxi(w: &mut Writer, taxi: &Taxi) {
    w.put_i16(taxi.id);
    w.put_coord(taxi.coord);
    w.put_coord(taxi.dest);
    w.put_opt_id(taxi.customer);
    w.put_bool(taxi.connected);
    w.put_bool(taxi.ready);
    w.put_bool(taxi.stopped);
    w.put_i32(taxi.wait_time);
}

fn decode_taxi(r: &mut Reader<'_>) -> ProtocolResult<Taxi> {
    Ok(Taxi {
        id: r.i16("taxi.id")?,
        coord: r.coord("taxi.coord")?,
        dest: r.coord("taxi.dest")?,
        customer: r.opt_id("taxi.customer")?,
        connected: r.bool("taxi.connected")?,
        ready: r.bool("taxi.ready")?,
        stopped: r.bool("taxi.stopped")?,
        wait_time: r.i32("taxi.wait_time")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;
    use crate::types::Coordinate;

    fn id(c: char) -> Identifier {
        Identifier::new(c).unwrap()
    }

    fn sample_map() -> Map {
        Map::new()
            .with_location(Location::new(id('A'), Coordinate::new(0, 0)))
            .with_location(Location::new(id('B'), Coordinate::new(19, 7)))
            .with_customer(
                Customer::new(id('a'), Coordinate::new(3, 4), id('B'))
                    .with_in_queue(true)
                    .with_next_request(42),
            )
            .with_customer(
                Customer::new(id('b'), Coordinate::new(5, 5), id('A')).with_onboard(true),
            )
            .with_taxi(
                Taxi::new(1, Coordinate::new(5, 5))
                    .with_dest(Coordinate::new(0, 0))
                    .with_customer(id('b'))
                    .with_connected(true)
                    .with_ready(true),
            )
            .with_taxi(
                Taxi::new(2, Coordinate::new(-1, 9))
                    .with_stopped(true)
                    .with_wait_time(17),
            )
    }

    #[test]
    fn element_sizes_match_layout() {
        let one_each = Map::new()
            .with_location(Location::new(id('A'), Coordinate::default()))
            .with_customer(Customer::new(id('a'), Coordinate::default(), id('A')))
            .with_taxi(Taxi::new(1, Coordinate::default()));
        assert_eq!(
            one_each.encode().len(),
            12 + LOCATION_SIZE + CUSTOMER_SIZE + TAXI_SIZE
        );
    }

    #[test]
    fn empty_map_is_three_zero_counts() {
        let bytes = Map::new().encode();
        assert_eq!(bytes, vec![0u8; 12]);
        assert_eq!(Map::decode(&bytes).unwrap(), Map::new());
    }

    #[test]
    fn full_map_roundtrip() {
        let map = sample_map();
        assert_eq!(Map::decode(&map.encode()).unwrap(), map);
    }

    #[test]
    fn single_customer_roundtrip() {
        let customer = Customer::new(id('c'), Coordinate::new(1, 2), id('a'))
            .with_in_queue(true)
            .with_next_request(10);
        let map = Map::new().with_customer(customer);

        let decoded = Map::decode(&map.encode()).unwrap();
        assert!(decoded.locations().is_empty());
        assert_eq!(decoded.customers(), &[customer]);
        assert!(decoded.taxis().is_empty());
    }

    #[test]
    fn taxi_order_is_preserved() {
        let map = Map::new()
            .with_taxi(Taxi::new(30, Coordinate::new(1, 1)))
            .with_taxi(Taxi::new(10, Coordinate::new(2, 2)))
            .with_taxi(Taxi::new(20, Coordinate::new(3, 3)));
        let decoded = Map::decode(&map.encode()).unwrap();
        let ids: Vec<i16> = decoded.taxis().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn unassigned_taxi_keeps_sentinel() {
        let map = Map::new().with_taxi(Taxi::new(4, Coordinate::new(0, 0)));
        let bytes = map.encode();
        // three counts, then id(2) coord(8) dest(8)
        assert_eq!(bytes[12 + 18], b'-');

        let taxi = Map::decode(&bytes).unwrap().taxis()[0];
        assert_eq!(taxi.customer, None);
    }

    #[test]
    fn every_proper_prefix_is_truncated() {
        let bytes = sample_map().encode();
        for k in 0..bytes.len() {
            let err = Map::decode(&bytes[..k]).unwrap_err();
            assert!(err.is_truncation(), "prefix {k}: {err}");
        }
    }

    #[test]
    fn count_larger_than_input_is_truncated() {
        let mut bytes = 1_000_000u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 8]);
        assert!(matches!(
            Map::decode(&bytes),
            Err(ProtocolError::TruncatedInput {
                field: "map.locations",
                ..
            })
        ));
    }

    #[test]
    fn invalid_boolean_is_malformed() {
        let map = Map::new().with_customer(Customer::new(id('a'), Coordinate::default(), id('A')));
        let mut bytes = map.encode();
        // two counts, then id(1) coord(8) destination(1)
        let onboard = 8 + 1 + 8 + 1;
        bytes[onboard] = 7;
        assert!(matches!(
            Map::decode(&bytes),
            Err(ProtocolError::MalformedEncoding {
                field: "customer.onboard",
                ..
            })
        ));
    }

    #[test]
    fn sentinel_is_not_a_location_id() {
        let mut bytes = Map::new()
            .with_location(Location::new(id('A'), Coordinate::default()))
            .encode();
        bytes[4] = b'-';
        assert!(matches!(
            Map::decode(&bytes),
            Err(ProtocolError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn lookups_resolve_keys() {
        let map = sample_map();
        let customer = map.customer(id('a')).unwrap();
        assert_eq!(map.location(customer.destination).unwrap().coord, Coordinate::new(19, 7));
        assert_eq!(map.taxi(2).unwrap().wait_time, 17);
        assert!(map.taxi(99).is_none());
    }

    #[test]
    fn validate_references_reports_dangling_keys() {
        assert!(sample_map().validate_references().is_empty());

        let map = Map::new()
            .with_customer(Customer::new(id('a'), Coordinate::default(), id('Z')))
            .with_taxi(Taxi::new(1, Coordinate::default()).with_customer(id('q')));
        let dangling = map.validate_references();
        assert_eq!(
            dangling,
            vec![
                DanglingReference::CustomerDestination {
                    customer: id('a'),
                    location: id('Z'),
                },
                DanglingReference::TaxiCustomer {
                    taxi: 1,
                    customer: id('q'),
                },
            ]
        );
        assert_eq!(dangling[1].to_string(), "taxi 1 carries unknown customer q");
    }

    #[test]
    fn json_view_shape() {
        let map = Map::new()
            .with_location(Location::new(id('A'), Coordinate::new(2, 3)))
            .with_taxi(Taxi::new(1, Coordinate::new(0, 0)).with_customer(id('a')));
        insta::assert_snapshot!(
            serde_json::to_string(&map).unwrap(),
            @r#"{"locations":[{"id":"A","coord":{"x":2,"y":3}}],"customers":[],"taxis":[{"id":1,"coord":{"x":0,"y":0},"dest":{"x":0,"y":0},"customer":"a","connected":false,"ready":false,"stopped":false,"waitTime":0}]}"#
        );
    }
}
