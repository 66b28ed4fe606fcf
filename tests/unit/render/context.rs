use super::*;

fn sky() -> LinearGradient {
    LinearGradient {
        start: Point::new(0.0, 0.0),
        end: Point::new(0.0, 100.0),
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: Color::rgba(255, 255, 255, 89),
            },
            GradientStop {
                offset: 0.4,
                color: Color::rgba(255, 255, 255, 0),
            },
            GradientStop {
                offset: 1.0,
                color: Color::rgb(10, 40, 10),
            },
        ],
    }
}

#[test]
fn gradient_samples_hit_stops_and_extend() {
    let g = sky();
    assert_eq!(g.sample(-1.0), Color::rgba(255, 255, 255, 89));
    assert_eq!(g.sample(0.4).a, 0);
    assert_eq!(g.sample(1.0), Color::rgb(10, 40, 10));
    assert_eq!(g.sample(2.0), Color::rgb(10, 40, 10));
    assert_eq!(g.sample(0.2).a, 45);
}

#[test]
fn gradient_axis_projects_onto_segment() {
    let g = sky();
    assert_eq!(g.axis_position(Point::new(50.0, 0.0)), 0.0);
    assert_eq!(g.axis_position(Point::new(-3.0, 50.0)), 0.5);
    assert_eq!(g.axis_position(Point::new(0.0, 100.0)), 1.0);

    let degenerate = LinearGradient {
        start: Point::new(1.0, 1.0),
        end: Point::new(1.0, 1.0),
        stops: Vec::new(),
    };
    assert_eq!(degenerate.axis_position(Point::new(9.0, 9.0)), 0.0);
    assert_eq!(degenerate.sample(0.5).a, 0);
}

#[test]
fn gradient_blends_transparent_stop_without_its_color() {
    let g = sky();

    // Halfway from transparent white to opaque dark green is half-covered dark green.
    let c = g.sample(0.7);
    assert_eq!((c.r, c.g, c.b), (10, 40, 10));
    assert!((127..=128).contains(&c.a), "alpha {}", c.a);

    let [r, gg, b, a] = g.sample_premultiplied(0.7);
    assert_eq!([r, gg, b], [5, 20, 5]);
    assert!((127..=128).contains(&a), "alpha {a}");

    // Near the transparent stop the premultiplied color stays dark.
    let [r, gg, b, a] = g.sample_premultiplied(0.46);
    assert!(a < 30, "alpha {a}");
    assert!(r <= 1 && gg <= 4 && b <= 1, "{r} {gg} {b}");
}
