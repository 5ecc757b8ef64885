use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ota_hotel_client::criterion::CriterionParams;
use ota_hotel_client::normalize::normalize;
use ota_hotel_client::tree::parse;
use ota_hotel_client::{
    Address, OrderBy, RequestSpec, ResponseProcessor, SearchOptions, SearchRequest, SessionConfig,
};
use rand::{seq::SliceRandom, thread_rng, Rng};

const CITIES: [&str; 5] = ["Venice", "Rome", "Florence", "Milan", "Naples"];

// Synthetic search response with `hotels` properties
fn search_response(hotels: usize) -> String {
    let mut rng = thread_rng();
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<OTA_HotelSearchRS xmlns="http://www.opentravel.org/OTA/2003/05" Version="1.003"><Success/><Properties>"#,
    );
    for i in 0..hotels {
        let city = CITIES.choose(&mut rng).unwrap_or(&"Venice");
        xml.push_str(&format!(
            r#"<Property HotelCode="{}" HotelName="Hotel {} &amp; Spa" HotelCityCode="{}"><Position Latitude="{:.5}" Longitude="{:.5}"/><Award Rating="{}"/><Amenities><Amenity>wifi</Amenity><Amenity>parking</Amenity></Amenities></Property>"#,
            i,
            i,
            city,
            rng.gen_range(36.0..47.0),
            rng.gen_range(6.0..18.0),
            rng.gen_range(1..6),
        ));
    }
    xml.push_str("</Properties></OTA_HotelSearchRS>");
    xml
}

pub fn pipeline_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("response_pipeline");

    for hotels in [10, 100, 1000].iter() {
        let xml = search_response(*hotels);

        group.bench_with_input(BenchmarkId::new("parse", hotels), &xml, |b, xml| {
            b.iter(|| parse(black_box(xml)).unwrap())
        });

        let document = parse(&xml).unwrap();
        group.bench_with_input(
            BenchmarkId::new("normalize", hotels),
            &document,
            |b, document| b.iter(|| normalize(black_box(&document.root))),
        );

        let processor = ResponseProcessor::new();
        group.bench_with_input(BenchmarkId::new("process", hotels), &xml, |b, xml| {
            b.iter(|| processor.process(black_box(xml)).unwrap())
        });
    }

    group.finish();
}

pub fn request_benchmark(c: &mut Criterion) {
    let config = SessionConfig::new("315", "test");
    let request = RequestSpec::Search(
        SearchRequest::new(CriterionParams {
            address: Some(Address::new("IT", "Venice")),
            segment_category_code: Some("2".to_string()),
            property_class_code: Some("20".to_string()),
            order_by: Some(OrderBy::Rating),
            ..Default::default()
        })
        .with_options(SearchOptions::default()),
    );

    c.bench_function("build_search_request", |b| {
        b.iter(|| request.build(black_box(&config)).unwrap())
    });
}

criterion_group!(benches, pipeline_benchmark, request_benchmark);
criterion_main!(benches);
