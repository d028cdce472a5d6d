use rpcwire::frame::{FrameError, discard_exact, read_exact, recv_frame, send_frame, write_all};
use tokio::io::{AsyncWriteExt, duplex};

#[tokio::test]
async fn frames_survive_one_byte_transfers() {
    // A 1-byte duplex buffer forces every read and write to be partial.
    let (mut writer, mut reader) = duplex(1);

    let payloads: Vec<Vec<u8>> = vec![b"Svc.Echo".to_vec(), Vec::new(), vec![0xAB; 300]];

    let sender = tokio::spawn({
        let payloads = payloads.clone();
        async move {
            for payload in &payloads {
                send_frame(&mut writer, payload).await.unwrap();
            }
            write_all(&mut writer, b"tail").await.unwrap();
        }
    });

    for payload in &payloads {
        let received = recv_frame(&mut reader, 1024).await.unwrap();
        assert_eq!(&received, payload);
    }

    let mut tail = [0u8; 4];
    read_exact(&mut reader, &mut tail).await.unwrap();
    assert_eq!(&tail, b"tail");

    sender.await.unwrap();
}

#[tokio::test]
async fn declared_length_above_limit_is_rejected() {
    let (mut writer, mut reader) = duplex(64);
    writer.write_all(&4097u32.to_be_bytes()).await.unwrap();

    let result = recv_frame(&mut reader, 4096).await;
    assert!(matches!(
        result,
        Err(FrameError::FrameTooLarge { len: 4097, max: 4096 })
    ));
}

#[tokio::test]
async fn stream_ending_mid_frame_is_unexpected_eof() {
    let (mut writer, mut reader) = duplex(64);
    writer.write_all(&10u32.to_be_bytes()).await.unwrap();
    writer.write_all(b"short").await.unwrap();
    drop(writer);

    let result = recv_frame(&mut reader, 1024).await;
    assert!(matches!(result, Err(FrameError::UnexpectedEof)));
}

#[tokio::test]
async fn stream_ending_inside_length_prefix_is_unexpected_eof() {
    let (mut writer, mut reader) = duplex(64);
    writer.write_all(&[0, 0]).await.unwrap();
    drop(writer);

    let result = recv_frame(&mut reader, 1024).await;
    assert!(matches!(result, Err(FrameError::UnexpectedEof)));
}

#[tokio::test]
async fn discard_consumes_exactly_the_requested_bytes() {
    let (mut writer, mut reader) = duplex(4);

    let sender = tokio::spawn(async move {
        write_all(&mut writer, &[7u8; 17]).await.unwrap();
        send_frame(&mut writer, b"next").await.unwrap();
    });

    discard_exact(&mut reader, 17).await.unwrap();
    assert_eq!(recv_frame(&mut reader, 64).await.unwrap(), b"next");

    sender.await.unwrap();
}

#[tokio::test]
async fn discard_past_end_of_stream_is_unexpected_eof() {
    let (mut writer, mut reader) = duplex(64);
    writer.write_all(&[1, 2, 3]).await.unwrap();
    drop(writer);

    let result = discard_exact(&mut reader, 8).await;
    assert!(matches!(result, Err(FrameError::UnexpectedEof)));
}
