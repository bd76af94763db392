use lux_core::CameraConfig;
use lux_renderer::{
    color_to_rgb8, generate_buckets, render_bucket, Background, CancelToken, Camera, Color,
    Dielectric, DiffuseLight, FrameBuffer, Lambertian, Metal, Plane, Quad, RenderSettings,
    RenderStatus, RenderWarning, Renderer, Scene, Sphere, Vec2, Vec3,
};

fn camera(width: u32, height: u32, yfov: f32) -> Camera {
    let config = CameraConfig::default()
        .with_resolution(width, height)
        .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(yfov, 0.0, 1.0);
    Camera::new(&config).unwrap()
}

fn mixed_scene() -> Scene {
    Scene::builder()
        .background(Background::Blend {
            from: Color::ONE,
            to: Color::new(0.5, 0.7, 1.0),
        })
        .add(Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, Lambertian::new(Color::splat(0.5))))
        .add(Sphere::new(Vec3::new(-1.0, 0.0, -4.0), 1.0, Dielectric::new(1.5)))
        .add(Sphere::new(Vec3::new(1.0, 0.0, -4.0), 1.0, Metal::new(Color::new(0.8, 0.6, 0.2), 0.3)))
        .add(Quad::new(
            Vec3::new(-1.0, 3.0, -5.0),
            Vec3::X * 2.0,
            Vec3::Z * 2.0,
            DiffuseLight::new(Color::splat(4.0)),
        ))
        .build()
}

#[test]
fn center_pixel_shows_albedo_under_white_sky() {
    let albedo = Color::new(0.6, 0.3, 0.1);
    let scene = Scene::builder()
        .background(Background::Pure(Color::ONE))
        .add(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 2.0, Lambertian::new(albedo)))
        .build();
    let camera = camera(9, 9, 30.0);
    let settings = RenderSettings {
        samples_per_pixel: 4,
        ..Default::default()
    };

    let output = Renderer::new(&camera, &scene, settings).unwrap().render();
    assert_eq!(output.status, RenderStatus::Completed);
    assert_eq!(output.image.get(4, 4), color_to_rgb8(albedo));
}

#[test]
fn pinhole_rays_share_origin_and_lens_rays_do_not() {
    let pinhole = camera(16, 16, 60.0);
    for (jitter, lens) in [(Vec2::ZERO, Vec2::new(0.9, 0.3)), (Vec2::splat(0.7), Vec2::new(0.2, 0.8))] {
        assert_eq!(pinhole.ray_for_sample(3, 5, jitter, lens).origin(), Vec3::ZERO);
    }

    let config = CameraConfig::default()
        .with_resolution(16, 16)
        .with_lens(60.0, 20.0, 3.0);
    let lens = Camera::new(&config).unwrap();
    let center = Vec2::splat(0.5);
    let a = lens.ray_for_sample(3, 5, center, Vec2::new(0.9, 0.3)).origin();
    let b = lens.ray_for_sample(3, 5, center, Vec2::new(0.2, 0.8)).origin();
    assert_ne!(a, b);
    assert!(a.length() <= lens.lens_radius() + 1e-5);
    assert!(b.length() <= lens.lens_radius() + 1e-5);

    // Both rays pass through the same point on the focus plane
    let ra = lens.ray_for_sample(3, 5, center, Vec2::new(0.9, 0.3));
    let rb = lens.ray_for_sample(3, 5, center, Vec2::new(0.2, 0.8));
    assert!((ra.at(1.0) - rb.at(1.0)).length() < 1e-4);
}

#[test]
fn renders_are_deterministic_across_thread_counts() {
    let scene = mixed_scene();
    let camera = camera(24, 16, 60.0);
    let base = RenderSettings {
        samples_per_pixel: 4,
        max_depth: 8,
        seed: 1234,
        bucket_size: 8,
        next_event_estimation: true,
        russian_roulette_depth: Some(3),
        ..Default::default()
    };

    let single = Renderer::new(
        &camera,
        &scene,
        RenderSettings {
            threads: 1,
            ..base.clone()
        },
    )
    .unwrap()
    .render();
    let multi = Renderer::new(
        &camera,
        &scene,
        RenderSettings {
            threads: 4,
            ..base.clone()
        },
    )
    .unwrap()
    .render();
    let global = Renderer::new(&camera, &scene, base.clone()).unwrap().render();

    assert_eq!(single.image, multi.image);
    assert_eq!(single.image, global.image);
    assert_eq!(single.stats, multi.stats);

    let reseeded = Renderer::new(
        &camera,
        &scene,
        RenderSettings {
            seed: 4321,
            ..base
        },
    )
    .unwrap()
    .render();
    assert_ne!(single.image, reseeded.image);
}

#[test]
fn empty_scene_renders_background_and_warns() {
    let scene = Scene::builder()
        .background(Background::Pure(Color::new(0.25, 0.5, 1.0)))
        .build();
    let camera = camera(12, 7, 60.0);

    let output = Renderer::new(&camera, &scene, RenderSettings::default())
        .unwrap()
        .render();

    assert_eq!(output.warnings, vec![RenderWarning::DegenerateScene]);
    let expected = color_to_rgb8(Color::new(0.25, 0.5, 1.0));
    for y in 0..7 {
        for x in 0..12 {
            assert_eq!(output.image.get(x, y), expected);
        }
    }
}

#[test]
fn facing_mirrors_terminate_at_max_depth() {
    let mirror = Metal::new(Color::splat(0.95), 0.0);
    let scene = Scene::builder()
        .background(Background::Pure(Color::ONE))
        .add(Plane::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z, mirror.clone()))
        .add(Plane::new(Vec3::new(0.0, 0.0, 2.0), -Vec3::Z, mirror))
        .build();
    let camera = camera(6, 6, 40.0);
    let settings = RenderSettings {
        samples_per_pixel: 2,
        max_depth: 12,
        ..Default::default()
    };

    let output = Renderer::new(&camera, &scene, settings).unwrap().render();
    assert_eq!(output.status, RenderStatus::Completed);
    assert!(output.stats.depth_exhausted > 0);
    assert_eq!(output.stats.samples, 6 * 6 * 2);
    assert_eq!(output.stats.anomalous_samples, 0);
}

#[test]
fn no_anomalous_samples_in_mixed_scene() {
    let scene = mixed_scene();
    let camera = camera(16, 16, 70.0);
    let settings = RenderSettings {
        samples_per_pixel: 8,
        max_depth: 16,
        next_event_estimation: true,
        ..Default::default()
    };

    let output = Renderer::new(&camera, &scene, settings).unwrap().render();
    assert_eq!(output.stats.anomalous_samples, 0);
    assert_eq!(output.stats.samples, 16 * 16 * 8);
    assert_eq!(
        output.stats.samples,
        output.stats.escaped + output.stats.absorbed + output.stats.depth_exhausted
    );
}

#[test]
fn cancelled_before_start_is_black() {
    let scene = mixed_scene();
    let camera = camera(10, 10, 60.0);
    let renderer = Renderer::new(&camera, &scene, RenderSettings::default()).unwrap();

    let cancel = CancelToken::new();
    cancel.cancel();
    let output = renderer.render_with_cancel(&cancel);

    assert_eq!(
        output.status,
        RenderStatus::Cancelled {
            pixels_rendered: 0,
            pixels_total: 100
        }
    );
    assert!(output.image.as_bytes().iter().all(|&b| b == 0));
    assert_eq!(output.stats.samples, 0);
}

#[test]
fn cancelled_mid_render_keeps_finished_pixels() {
    let scene = Scene::builder()
        .background(Background::Pure(Color::ONE))
        .build();
    let camera = camera(64, 64, 60.0);
    let settings = RenderSettings {
        samples_per_pixel: 1,
        bucket_size: 8,
        threads: 1,
        ..Default::default()
    };
    let renderer = Renderer::new(&camera, &scene, settings).unwrap();

    let expired = CancelToken::new().with_deadline(std::time::Instant::now());
    let none = renderer.render_with_cancel(&expired);
    assert!(!none.status.is_complete());

    // Cancel halfway through the bucket list
    let mut partial = FrameBuffer::new(64, 64);
    let buckets = generate_buckets(64, 64, 8);
    let token = CancelToken::new();
    for (i, bucket) in buckets.iter().enumerate() {
        if i == buckets.len() / 2 {
            token.cancel();
        }
        let result = render_bucket(bucket, &camera, &scene, renderer.settings(), &token);
        assert_eq!(result.is_complete(), i < buckets.len() / 2);
        partial.merge_bucket(&result);
    }
    let image = partial.finalize();
    let first = buckets[0];
    let last = buckets[buckets.len() - 1];
    assert_eq!(image.get(first.x, first.y), [255, 255, 255]);
    assert_eq!(image.get(last.x, last.y), [0, 0, 0]);
}

/// Mean 8-bit value over the whole image.
fn mean_byte(camera: &Camera, scene: &Scene, nee: bool) -> f32 {
    let settings = RenderSettings {
        samples_per_pixel: 256,
        max_depth: 6,
        next_event_estimation: nee,
        ..Default::default()
    };
    let output = Renderer::new(camera, scene, settings).unwrap().render();
    let bytes = output.image.as_bytes();
    bytes.iter().map(|&b| b as f32).sum::<f32>() / bytes.len() as f32
}

#[test]
fn nee_matches_brute_force_for_every_emitter_kind() {
    let camera = {
        let config = CameraConfig::default()
            .with_resolution(8, 8)
            .with_position(Vec3::new(0.0, 1.0, 1.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 0.0, 1.0);
        Camera::new(&config).unwrap()
    };

    let lit_floor = Scene::builder()
        .add(Plane::new(Vec3::ZERO, Vec3::Y, Lambertian::new(Color::splat(0.5))))
        .add(Plane::new(Vec3::Y * 3.0, -Vec3::Y, DiffuseLight::new(Color::ONE)))
        .add(Quad::new(
            Vec3::new(-0.5, 2.0, -0.5),
            Vec3::Z,
            Vec3::X,
            DiffuseLight::new(Color::splat(4.0)),
        ))
        .build();

    let dome = Scene::builder()
        .add(Sphere::new(Vec3::ZERO, 0.5, Lambertian::new(Color::splat(0.5))))
        .add(Sphere::new(Vec3::ZERO, 50.0, DiffuseLight::new(Color::ONE)))
        .build();

    for scene in [&lit_floor, &dome] {
        let brute = mean_byte(&camera, scene, false);
        let nee = mean_byte(&camera, scene, true);
        assert!(brute > 100.0, "brute force too dark: {brute}");
        assert!((brute - nee).abs() < 3.0, "nee {nee} vs brute force {brute}");
    }
}
