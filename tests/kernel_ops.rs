//! End-to-end kernel tests: configure, partition, and run through an
//! execution context.

use corten::prelude::*;

#[test]
fn test_fill_end_to_end_single_threaded() {
    let mut arena = TensorArena::new();
    let out = arena.alloc(TensorDescriptor::new([16, 16], DataType::F32));
    let kernel: KernelOp = FillKernel::configure(&arena, out, 2.5f32.to_ne_bytes().to_vec())
        .unwrap()
        .into();

    let mut buffer = TensorBuffer::allocate(&arena, out);
    let mut io = KernelIo::new();
    io.bind(out, &mut buffer);

    let ctx = ExecutionContext::single_threaded();
    ctx.run(&kernel, &arena, &io).unwrap();

    for element in buffer.as_slice().chunks_exact(4) {
        assert_eq!(f32::from_ne_bytes(element.try_into().unwrap()), 2.5);
    }
}

#[cfg(feature = "rayon")]
#[test]
fn test_fill_end_to_end_multi_threaded() {
    let mut arena = TensorArena::new();
    let out = arena.alloc(TensorDescriptor::new([64, 64], DataType::U8));
    let kernel: KernelOp = FillKernel::configure(&arena, out, vec![0xAB]).unwrap().into();

    let mut buffer = TensorBuffer::allocate(&arena, out);
    let mut io = KernelIo::new();
    io.bind(out, &mut buffer);

    let ctx = ExecutionContext::with_threads(4).unwrap();
    ctx.run(&kernel, &arena, &io).unwrap();

    assert!(buffer.as_slice().iter().all(|&b| b == 0xAB));
}

#[test]
fn test_copy_auto_initializes_and_copies() {
    let mut arena = TensorArena::new();
    let src = arena.alloc(TensorDescriptor::new([32, 4], DataType::U8));
    let dst = arena.alloc(TensorDescriptor::empty());
    let kernel: KernelOp = CopyKernel::configure(&mut arena, src, dst).unwrap().into();

    assert_eq!(arena.get(dst).tensor_shape().as_slice(), &[32, 4]);
    assert_eq!(arena.get(dst).data_type(), DataType::U8);

    let mut src_buf = TensorBuffer::allocate(&arena, src);
    for (index, byte) in src_buf.as_mut_slice().iter_mut().enumerate() {
        *byte = (index % 251) as u8;
    }
    let mut dst_buf = TensorBuffer::allocate(&arena, dst);

    let mut io = KernelIo::new();
    io.bind(src, &mut src_buf);
    io.bind(dst, &mut dst_buf);

    let ctx = ExecutionContext::single_threaded();
    ctx.run(&kernel, &arena, &io).unwrap();

    assert_eq!(src_buf.as_slice(), dst_buf.as_slice());
}

#[test]
fn test_fill_then_copy_pipeline() {
    let mut arena = TensorArena::new();
    let a = arena.alloc(TensorDescriptor::new([8, 8], DataType::S32));
    let b = arena.alloc(TensorDescriptor::empty());

    let fill: KernelOp = FillKernel::configure(&arena, a, 7i32.to_ne_bytes().to_vec())
        .unwrap()
        .into();
    let copy: KernelOp = CopyKernel::configure(&mut arena, a, b).unwrap().into();

    let mut a_buf = TensorBuffer::allocate(&arena, a);
    let mut b_buf = TensorBuffer::allocate(&arena, b);
    let ctx = ExecutionContext::single_threaded();

    let mut io = KernelIo::new();
    io.bind(a, &mut a_buf);
    ctx.run(&fill, &arena, &io).unwrap();
    drop(io);

    let mut io = KernelIo::new();
    io.bind(a, &mut a_buf);
    io.bind(b, &mut b_buf);
    ctx.run(&copy, &arena, &io).unwrap();

    for element in b_buf.as_slice().chunks_exact(4) {
        assert_eq!(i32::from_ne_bytes(element.try_into().unwrap()), 7);
    }
}

#[test]
fn test_stepped_fill_covers_ragged_tail() {
    let mut arena = TensorArena::new();
    let out = arena.alloc(TensorDescriptor::new([10, 4], DataType::U8));
    let kernel: KernelOp =
        FillKernel::configure_with_steps(&arena, out, vec![3], Steps::new().set(0, 4))
            .unwrap()
            .into();
    assert_eq!(kernel.window().dimension(0).end(), 12);

    let mut buffer = TensorBuffer::allocate(&arena, out);
    let mut io = KernelIo::new();
    io.bind(out, &mut buffer);
    ExecutionContext::single_threaded()
        .run(&kernel, &arena, &io)
        .unwrap();

    // Every in-shape element written, nothing out of bounds touched.
    assert_eq!(buffer.len(), 40);
    assert!(buffer.as_slice().iter().all(|&b| b == 3));
}

#[test]
fn test_configure_failures_are_recoverable() {
    let mut arena = TensorArena::new();
    let out = arena.alloc(TensorDescriptor::new([4, 4], DataType::F32));

    // Wrong value width: fix and retry.
    let err = FillKernel::configure(&arena, out, vec![0; 2]).unwrap_err();
    assert!(err.is_recoverable());
    assert!(FillKernel::configure(&arena, out, vec![0; 4]).is_ok());

    // Mismatched copy operands: fix the destination and retry.
    let bad = arena.alloc(TensorDescriptor::new([4, 3], DataType::F32));
    let err = CopyKernel::configure(&mut arena, out, bad).unwrap_err();
    assert!(err.is_recoverable());
    arena.get_mut(bad).set_tensor_shape([4, 4]).unwrap();
    assert!(CopyKernel::configure(&mut arena, out, bad).is_ok());
}

#[test]
fn test_run_requires_bound_buffers() {
    let mut arena = TensorArena::new();
    let out = arena.alloc(TensorDescriptor::new([4, 4], DataType::U8));
    let kernel: KernelOp = FillKernel::configure(&arena, out, vec![1]).unwrap().into();

    let io = KernelIo::new();
    let result = ExecutionContext::single_threaded().run(&kernel, &arena, &io);
    assert!(matches!(&result, Err(Error::UnboundTensor { id: 0 })));
    assert!(!result.unwrap_err().is_recoverable());
}
