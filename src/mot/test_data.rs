use crate::mot::Detection;
use crate::utils::BBox;

pub fn det(class_name: &str, x1: i32, y1: i32, x2: i32, y2: i32) -> Detection {
    Detection::new(class_name, 0.9, BBox::new(x1, y1, x2, y2))
}

// 20x20 box whose centroid is exactly (cx, cy)
pub fn det_at(class_name: &str, cx: i32, cy: i32) -> Detection {
    det(class_name, cx - 10, cy - 10, cx + 10, cy + 10)
}

// Three frames: one car drifting slightly, then a single far away object
pub fn get_naive_data() -> Vec<Vec<Detection>> {
    vec![
        vec![det("car", 100, 120, 200, 180)],
        vec![det("car", 105, 122, 205, 182)],
        vec![det("car", 300, 400, 360, 460)],
    ]
}

// A car that parks for a while, then a dog crossing an empty road
pub fn get_parking_data() -> Vec<Vec<Detection>> {
    vec![
        vec![det("car", 100, 120, 200, 180)],
        vec![det("car", 105, 122, 205, 182)],
        vec![det("car", 106, 121, 206, 181)],
        vec![det("dog", 220, 150, 260, 200)],
    ]
}

// Two lanes of traffic moving right at different speeds plus a pedestrian
pub fn get_traffic_data() -> Vec<Vec<Detection>> {
    (0..12)
        .map(|i| {
            let mut frame = vec![
                det_at("car", 50 + i * 30, 100),
                det_at("truck", 40 + i * 12, 300),
            ];
            if i % 4 == 1 {
                frame.push(det_at("person", 600, 200 + i));
            }
            frame
        })
        .collect()
}
